//! Paper entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Paper lifecycle status. `AiDraft` rows are created from LLM suggestions
/// and gated by a database trigger before promotion to `UnderReview`.
#[derive(
    Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum PaperStatus {
    #[sea_orm(string_value = "Draft")]
    #[serde(rename = "Draft")]
    Draft,

    #[sea_orm(string_value = "Under Review")]
    #[serde(rename = "Under Review")]
    UnderReview,

    #[sea_orm(string_value = "In Review")]
    #[serde(rename = "In Review")]
    InReview,

    #[sea_orm(string_value = "Published")]
    #[serde(rename = "Published")]
    Published,

    #[sea_orm(string_value = "Accepted")]
    #[serde(rename = "Accepted")]
    Accepted,

    #[sea_orm(string_value = "Rejected")]
    #[serde(rename = "Rejected")]
    Rejected,

    #[sea_orm(string_value = "AI_DRAFT")]
    #[serde(rename = "AI_DRAFT")]
    AiDraft,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Papers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub paper_id: String,

    #[sea_orm(column_type = "Text")]
    pub paper_title: String,

    #[sea_orm(column_name = "abstract", column_type = "Text", nullable)]
    pub abstract_text: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub pdf_url: Option<String>,

    pub upload_timestamp: Option<DateTime>,

    pub status: PaperStatus,

    pub venue_id: Option<String>,

    pub project_id: Option<String>,

    pub dataset_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::venue::Entity",
        from = "Column::VenueId",
        to = "super::venue::Column::VenueId"
    )]
    Venue,

    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::ProjectId"
    )]
    Project,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,

    #[sea_orm(has_many = "super::authorship::Entity")]
    Authorship,
}

impl Related<super::venue::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Venue.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_declared_relations_resolve() {
        let _ = <Entity as Related<crate::db::models::venue::Entity>>::to();
        let _ = <Entity as Related<crate::db::models::project::Entity>>::to();
        let _ = <Entity as Related<crate::db::models::review::Entity>>::to();
        assert_eq!(Relation::iter().count(), 4);
    }
}
