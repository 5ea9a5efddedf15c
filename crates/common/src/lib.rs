pub mod action;
pub mod condition;
pub mod inspect;
pub mod model;
pub mod resource_id;
pub mod update;
pub mod window;

pub use action::{ActionArg, ActionRemoval};
pub use condition::{ConditionOperator, ConditionSpec, TimeAggregation};
pub use model::{AlertRuleResource, ResourceGroup, RuleAction};
pub use update::RuleUpdate;
pub use window::WindowSize;
