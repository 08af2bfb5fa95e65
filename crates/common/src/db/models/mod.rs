//! SeaORM entity models
//!
//! Entities mirror the given relational schema; triggers and stored
//! procedures on the database side own the invariants.

mod authorship;
mod dataset;
mod paper;
mod project;
mod related_paper;
mod review;
mod user;
mod venue;

pub use paper::{
    ActiveModel as PaperActiveModel, Column as PaperColumn, Entity as PaperEntity,
    Model as Paper, PaperStatus,
};

pub use user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as User,
};

pub use venue::{
    ActiveModel as VenueActiveModel, Column as VenueColumn, Entity as VenueEntity,
    Model as Venue,
};

pub use project::{
    ActiveModel as ProjectActiveModel, Column as ProjectColumn, Entity as ProjectEntity,
    Model as Project,
};

pub use dataset::{
    ActiveModel as DatasetActiveModel, Column as DatasetColumn, Entity as DatasetEntity,
    Model as Dataset,
};

pub use authorship::{
    ActiveModel as AuthorshipActiveModel, Column as AuthorshipColumn,
    Entity as AuthorshipEntity, Model as Authorship,
};

pub use review::{
    ActiveModel as ReviewActiveModel, Column as ReviewColumn, Entity as ReviewEntity,
    Model as Review,
};

pub use related_paper::{
    ActiveModel as RelatedPaperActiveModel, Column as RelatedPaperColumn,
    Entity as RelatedPaperEntity, Model as RelatedPaper,
};
