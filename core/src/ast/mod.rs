pub mod kind;
pub mod node;

pub use kind::BinaryOperator;
pub use node::AstNode;
