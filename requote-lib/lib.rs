use smartstring::{LazyCompact, SmartString};

pub mod change;
pub mod classify;
pub mod document;
pub mod edit;
pub mod fix;
pub mod position;
pub mod selection;
pub mod session;
pub mod string_literal;
pub mod text;

pub type Tendril = SmartString<LazyCompact>;
