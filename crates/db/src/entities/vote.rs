//! Vote ledger entity.
//!
//! One row per `(round, participant)` pair. Rows are keyed by opaque
//! references rather than entity ids, so the ledger survives entry
//! deletion and never leaks storage ids to the public API.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub round_reference: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub participant_reference: String,

    /// Accumulated vote count
    pub votes: i64,

    /// Most recent vote timestamp
    pub last_vote_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
