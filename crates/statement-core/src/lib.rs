pub mod error;
pub mod findings;
pub mod series;
pub mod traits;
pub mod types;

pub use error::*;
pub use findings::*;
pub use series::*;
pub use traits::*;
pub use types::*;
