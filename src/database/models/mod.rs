pub mod nullable;
pub mod organization;
pub mod posting;
pub mod user;

pub use organization::{NewOrganization, Organization, OrganizationDetail, OrganizationFilter, OrganizationUpdate};
pub use posting::{NewPosting, Posting, PostingFilter, PostingSummary, PostingUpdate};
pub use user::{Application, NewApplication, NewUser, User, UserUpdate};
