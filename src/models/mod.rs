mod project;
mod validation;

pub use project::Project;
pub use validation::{ValidationError, ValidationErrors};
