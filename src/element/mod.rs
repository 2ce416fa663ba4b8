pub mod applicator;
pub mod cleaner;
pub mod defaults;
pub mod element_model;
pub mod naming;
pub mod readonly;
