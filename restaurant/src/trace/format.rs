//! State log line formats

use serde::{Deserialize, Serialize};
use shared::RestaurantSnapshot;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::core::error::TraceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceFormat {
    /// Fixed-width columns, one line per snapshot
    #[default]
    Text,
    /// One JSON-encoded snapshot per line
    Json,
}

impl FromStr for TraceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(TraceFormat::Text),
            "json" => Ok(TraceFormat::Json),
            other => Err(format!("unknown trace format: {other}")),
        }
    }
}

impl TraceFormat {
    /// Header written once by the setup step; JSON logs have none
    pub fn header(&self, n_groups: usize, n_tables: usize) -> Option<String> {
        match self {
            TraceFormat::Json => None,
            TraceFormat::Text => {
                let mut out = String::from(
                    "                   Restaurant - Description of the internal state\n\n",
                );
                out.push_str(" CH  WT  RC ");
                for g in 0..n_groups {
                    let _ = write!(out, " G{g:02}");
                }
                out.push_str("  GWT");
                for t in 0..n_tables {
                    let _ = write!(out, " T{t:02}");
                }
                out.push('\n');
                Some(out)
            }
        }
    }

    pub fn line(&self, snapshot: &RestaurantSnapshot) -> Result<String, TraceError> {
        match self {
            TraceFormat::Json => {
                let mut line = serde_json::to_string(snapshot)?;
                line.push('\n');
                Ok(line)
            }
            TraceFormat::Text => Ok(text_line(snapshot)),
        }
    }
}

fn text_line(snapshot: &RestaurantSnapshot) -> String {
    let roles = &snapshot.roles;
    let mut out = format!(
        "{} {} {} ",
        roles.chef.code(),
        roles.waiter.code(),
        roles.receptionist.code()
    );
    for state in &snapshot.groups {
        let _ = write!(out, " {}", state.code());
    }
    let _ = write!(out, "  {:>3}", snapshot.groups_waiting);
    for table in snapshot.table_occupancy() {
        match table.holder() {
            Some(group) => {
                let _ = write!(out, " {:>3}", group.index());
            }
            None => out.push_str("   ."),
        }
    }
    out.push('\n');
    out
}
