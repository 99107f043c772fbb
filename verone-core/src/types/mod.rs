//! 类型定义模块

mod draft;
mod edit_state;
mod section;
mod target;
mod update;

pub use draft::{Draft, Record};
pub use edit_state::{SaveErrorKind, SectionEditState, SectionError, VERSION_FIELD};
pub use section::Section;
pub use target::{BackingTarget, EntityIds, EntityKind};
pub use update::{DeletedAlerts, UpdateRequest};
