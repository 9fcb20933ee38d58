pub mod constraints;
pub mod cost;
pub mod format;
pub mod greedy;
pub mod planner;
pub mod reconcile;
pub mod renewable;
pub mod strategies;
pub mod types;

pub use constraints::*;
pub use cost::*;
pub use greedy::*;
pub use planner::*;
pub use reconcile::*;
pub use renewable::*;
pub use strategies::*;
pub use types::*;
