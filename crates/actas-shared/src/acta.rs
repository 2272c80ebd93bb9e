//! Delivery/handover reports ("Actas de Entrega") as served by the backend

use std::ops::Deref;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{errors::ConversionError, id::DbId};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Acta {
    pub id: DbId,
    pub folio: Folio,
    pub entity_name: String,
    pub delivering_official: String,
    pub receiving_official: String,
    pub delivery_date: NaiveDate,
    pub status: ActaStatus,
}

#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActaStatus {
    Draft,
    InReview,
    Signed,
    Archived,
}

/// Identifier printed on the document. Validated when deserialized so a bad
/// record fails the whole response instead of reaching the table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Folio(String);

impl Folio {
    pub const MAX_LENGTH: usize = 32;
}

impl TryFrom<String> for Folio {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(ConversionError::Empty);
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(ConversionError::MaxExceeded {
                max: Self::MAX_LENGTH,
                actual: value.len(),
            });
        }
        Ok(Self(value))
    }
}

impl From<Folio> for String {
    fn from(value: Folio) -> Self {
        value.0
    }
}

impl Deref for Folio {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0[..]
    }
}
