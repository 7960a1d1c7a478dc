//! Lead model and the closed domain sets it is classified by.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Manager responsible for a lead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Manager {
    #[serde(rename = "Саркаров Тимур")]
    Sarkarov,
    #[serde(rename = "Намазов Замир")]
    Namazov,
    #[serde(rename = "Утебаев Валерий")]
    Utebaev,
    #[serde(rename = "Гаврилов Владимир")]
    Gavrilov,
}

impl Manager {
    pub const ALL: [Manager; 4] = [
        Manager::Sarkarov,
        Manager::Namazov,
        Manager::Utebaev,
        Manager::Gavrilov,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Manager::Sarkarov => "Саркаров Тимур",
            Manager::Namazov => "Намазов Замир",
            Manager::Utebaev => "Утебаев Валерий",
            Manager::Gavrilov => "Гаврилов Владимир",
        }
    }
}

impl FromStr for Manager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Manager::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown manager: {}", s))
    }
}

impl fmt::Display for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Acquisition channel a lead came through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Source {
    #[serde(rename = "ТГ АИ")]
    TelegramAi,
    #[serde(rename = "ТГ рассылка")]
    TelegramMailing,
    #[serde(rename = "ТГ бот")]
    TelegramBot,
    #[serde(rename = "ЯД")]
    YandexDirect,
    #[serde(rename = "Сайт")]
    Website,
    #[serde(rename = "Входящий звонок")]
    InboundCall,
    #[serde(rename = "КЦ Лиды")]
    CallCenter,
    #[serde(rename = "От Максима")]
    FromMaksim,
    #[serde(rename = "Другое")]
    Other,
}

impl Source {
    pub const ALL: [Source; 9] = [
        Source::TelegramAi,
        Source::TelegramMailing,
        Source::TelegramBot,
        Source::YandexDirect,
        Source::Website,
        Source::InboundCall,
        Source::CallCenter,
        Source::FromMaksim,
        Source::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::TelegramAi => "ТГ АИ",
            Source::TelegramMailing => "ТГ рассылка",
            Source::TelegramBot => "ТГ бот",
            Source::YandexDirect => "ЯД",
            Source::Website => "Сайт",
            Source::InboundCall => "Входящий звонок",
            Source::CallCenter => "КЦ Лиды",
            Source::FromMaksim => "От Максима",
            Source::Other => "Другое",
        }
    }

    /// Static KPI score credited for a lead from this source.
    pub fn kpi_weight(&self) -> f64 {
        match self {
            Source::TelegramAi | Source::TelegramMailing | Source::CallCenter => 1.0,
            Source::TelegramBot
            | Source::YandexDirect
            | Source::Website
            | Source::InboundCall
            | Source::FromMaksim => 0.5,
            Source::Other => 0.0,
        }
    }
}

/// Pipeline classification. Any status may follow any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    New,
    Contacted,
    Qualified,
    #[serde(rename = "Proposal Sent")]
    ProposalSent,
    Won,
    Lost,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::New,
        Status::Contacted,
        Status::Qualified,
        Status::ProposalSent,
        Status::Won,
        Status::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Contacted => "Contacted",
            Status::Qualified => "Qualified",
            Status::ProposalSent => "Proposal Sent",
            Status::Won => "Won",
            Status::Lost => "Lost",
        }
    }

    /// Localized label shown to managers.
    pub fn label(&self) -> &'static str {
        match self {
            Status::New => "Новый",
            Status::Contacted => "Связались",
            Status::Qualified => "Квалифицирован",
            Status::ProposalSent => "Отправлено КП",
            Status::Won => "Выигран",
            Status::Lost => "Проигран",
        }
    }
}

/// A stored lead. Every field is required when reading a record back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub manager: Manager,
    pub source: Source,
    pub status: Status,
    pub value: f64,
    pub source_description: String,
    /// Fixed at creation from the source weight.
    pub kpi: f64,
}

/// Creation input: a lead before the repository assigns identity, timestamp and KPI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub manager: Manager,
    pub source: Source,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub source_description: String,
}

fn default_status() -> Status {
    Status::New
}

impl NewLead {
    /// Materialize the stored record.
    pub fn into_lead(self, id: String, created_at: DateTime<Utc>) -> Lead {
        let kpi = self.source.kpi_weight();
        Lead {
            id,
            created_at,
            name: self.name,
            email: self.email,
            phone: self.phone,
            manager: self.manager,
            source: self.source,
            status: self.status,
            value: self.value,
            source_description: self.source_description,
            kpi,
        }
    }
}

/// Replacement input for an existing lead.
///
/// `id`, `createdAt` and `kpi` are not part of it; when a client sends them
/// back they are ignored and the stored values kept.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpdate {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub manager: Manager,
    pub source: Source,
    pub status: Status,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub source_description: String,
}

impl LeadUpdate {
    /// Apply over the stored record, keeping its identity, timestamp and KPI.
    pub fn apply_to(self, existing: Lead) -> Lead {
        Lead {
            id: existing.id,
            created_at: existing.created_at,
            name: self.name,
            email: self.email,
            phone: self.phone,
            manager: self.manager,
            source: self.source,
            status: self.status,
            value: self.value,
            source_description: self.source_description,
            kpi: existing.kpi,
        }
    }
}

impl From<Lead> for LeadUpdate {
    fn from(lead: Lead) -> Self {
        Self {
            name: lead.name,
            email: lead.email,
            phone: lead.phone,
            manager: lead.manager,
            source: lead.source,
            status: lead.status,
            value: lead.value,
            source_description: lead.source_description,
        }
    }
}

/// Email as compared for duplicates: lowercased as written. `None` only when empty.
pub fn normalized_email(email: &str) -> Option<String> {
    (!email.is_empty()).then(|| email.to_lowercase())
}

/// Phone as compared for duplicates: its digits, possibly none. `None` only when empty.
pub fn normalized_phone(phone: &str) -> Option<String> {
    (!phone.is_empty()).then(|| phone.chars().filter(char::is_ascii_digit).collect())
}

/// Every lead in the store, unfiltered.
///
/// Only the repository builds one, so anything that takes a `&LeadBook`
/// is guaranteed to see the global collection rather than a filtered view.
#[derive(Debug, Clone)]
pub struct LeadBook(Vec<Lead>);

impl LeadBook {
    pub(crate) fn new(leads: Vec<Lead>) -> Self {
        Self(leads)
    }
}

impl Deref for LeadBook {
    type Target = [Lead];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&Status::ProposalSent).unwrap(),
            "\"Proposal Sent\""
        );
        assert_eq!(
            serde_json::from_str::<Manager>("\"Намазов Замир\"").unwrap(),
            Manager::Namazov
        );
        assert_eq!(
            serde_json::from_str::<Source>("\"КЦ Лиды\"").unwrap(),
            Source::CallCenter
        );
        for source in Source::ALL {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source.as_str()));
        }
    }

    #[test]
    fn test_kpi_weights() {
        assert_eq!(Source::TelegramAi.kpi_weight(), 1.0);
        assert_eq!(Source::TelegramBot.kpi_weight(), 0.5);
        assert_eq!(Source::Other.kpi_weight(), 0.0);
    }

    #[test]
    fn test_new_lead_into_lead_assigns_kpi() {
        let new_lead = NewLead {
            name: "Acme".to_string(),
            email: String::new(),
            phone: String::new(),
            manager: Manager::Gavrilov,
            source: Source::Website,
            status: Status::New,
            value: 10.0,
            source_description: String::new(),
        };
        let lead = new_lead.into_lead("abc".to_string(), Utc::now());
        assert_eq!(lead.id, "abc");
        assert_eq!(lead.kpi, 0.5);
    }

    #[test]
    fn test_lead_json_is_camel_case() {
        let json = serde_json::json!({
            "id": "1",
            "createdAt": "2024-05-01T10:00:00Z",
            "name": "Acme",
            "email": "a@b.c",
            "phone": "+7 900",
            "manager": "Утебаев Валерий",
            "source": "ЯД",
            "status": "Won",
            "value": 250.0,
            "sourceDescription": "campaign",
            "kpi": 0.5
        });
        let lead: Lead = serde_json::from_value(json).unwrap();
        assert_eq!(lead.manager, Manager::Utebaev);
        assert_eq!(lead.source_description, "campaign");
        let back = serde_json::to_value(&lead).unwrap();
        assert_eq!(back["createdAt"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn test_stored_lead_requires_identity_timestamp_and_kpi() {
        let full = serde_json::json!({
            "id": "1",
            "createdAt": "2024-05-01T10:00:00Z",
            "name": "Acme",
            "email": "",
            "phone": "",
            "manager": "Утебаев Валерий",
            "source": "ЯД",
            "status": "New",
            "value": 0.0,
            "sourceDescription": "",
            "kpi": 0.5
        });
        assert!(serde_json::from_value::<Lead>(full.clone()).is_ok());

        for field in ["id", "createdAt", "kpi"] {
            let mut partial = full.clone();
            partial.as_object_mut().unwrap().remove(field);
            assert!(
                serde_json::from_value::<Lead>(partial).is_err(),
                "{} should be required",
                field
            );
        }
    }

    #[test]
    fn test_lead_update_ignores_identity_fields() {
        let update: LeadUpdate = serde_json::from_value(serde_json::json!({
            "id": "forged",
            "createdAt": "1999-01-01T00:00:00Z",
            "kpi": 42.0,
            "name": "Acme v2",
            "manager": "Намазов Замир",
            "source": "Другое",
            "status": "Won"
        }))
        .unwrap();

        let existing = NewLead {
            name: "Acme".to_string(),
            email: "a@b.c".to_string(),
            phone: String::new(),
            manager: Manager::Gavrilov,
            source: Source::TelegramAi,
            status: Status::New,
            value: 0.0,
            source_description: String::new(),
        }
        .into_lead("abc".to_string(), Utc::now());

        let lead = update.apply_to(existing.clone());
        assert_eq!(lead.id, "abc");
        assert_eq!(lead.created_at, existing.created_at);
        assert_eq!(lead.kpi, 1.0);
        assert_eq!(lead.source, Source::Other);
        assert_eq!(lead.email, "");
    }

    #[test]
    fn test_normalization() {
        assert_eq!(
            normalized_email("John@Example.COM"),
            Some("john@example.com".to_string())
        );
        assert_eq!(
            normalized_email(" a@b.c"),
            Some(" a@b.c".to_string())
        );
        assert_eq!(normalized_email("   "), Some("   ".to_string()));
        assert_eq!(normalized_email(""), None);
        assert_eq!(
            normalized_phone("+7 (900) 123-45-67"),
            Some("79001234567".to_string())
        );
        assert_eq!(normalized_phone("+-"), Some(String::new()));
        assert_eq!(normalized_phone(""), None);
    }
}
