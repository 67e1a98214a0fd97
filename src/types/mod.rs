mod category;
mod condition;
mod config;
mod error;
mod pattern;
mod property;
mod quantity;
mod timestamp;
mod value;
mod version;

pub use category::Category;
pub use condition::{property, qualified, CompareOp, Condition, PropertyRef};
pub use config::{ArrayErrorPolicy, EvalConfig};
pub use error::{PropertyFault, SemanticError, ValueError};
pub use pattern::Pattern;
pub use property::{Container, Property, PropertyTree};
pub use quantity::{Quantity, UnitPrefix};
pub use timestamp::Timestamp;
pub use value::{Value, ValueKind};
pub use version::Version;
