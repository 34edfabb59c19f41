//! Domain logic - pure versioning rules independent of npm and git

pub mod build_type;
pub mod dist_tag;
pub mod prerelease;
pub mod version;

pub use build_type::BuildType;
pub use dist_tag::DistTag;
pub use prerelease::PreReleaseKind;
pub use version::{ParsedVersion, Version};
