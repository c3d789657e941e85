//! Process-lifetime, append-only diagnostics log.
//!
//! Entries live only as long as the process. The id counter starts at 1 on
//! every start; the counter and the append share one lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::diagnostics::types::{DiagnosticEntry, DiagnosticsError, NewDiagnostic};
use crate::observability::metrics;

#[derive(Debug)]
struct LogState {
    entries: Vec<DiagnosticEntry>,
    next_id: u64,
}

/// In-memory diagnostics log shared by the HTTP handlers.
#[derive(Debug)]
pub struct DiagnosticsLog {
    state: Mutex<LogState>,
}

impl DiagnosticsLog {
    /// Empty log, counter at 1.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LogState {
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogState> {
        // Nothing in the critical section can leave the state half-written.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validate and store a new entry.
    ///
    /// Only absence is rejected: a missing, `null` or empty `symptome`, or a
    /// missing or `null` `response`. Whitespace and blank response fields are
    /// stored as given.
    pub fn append(&self, new: NewDiagnostic) -> Result<DiagnosticEntry, DiagnosticsError> {
        let symptome = new
            .symptome
            .filter(|s| !s.is_empty())
            .ok_or(DiagnosticsError::MissingField)?;
        let response = new.response.ok_or(DiagnosticsError::MissingField)?;

        let mut state = self.lock();
        let entry = DiagnosticEntry {
            id: state.next_id,
            symptome,
            response,
            created_at: Utc::now(),
        };
        state.next_id += 1;
        state.entries.push(entry.clone());
        metrics::record_diagnostics_size(state.entries.len());

        tracing::debug!(id = entry.id, "Diagnostics entry stored");
        Ok(entry)
    }

    /// All entries, most recent first.
    pub fn list(&self) -> Vec<DiagnosticEntry> {
        let mut entries = self.lock().entries.clone();
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        entries
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DiagnosticsLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::types::DiagnosticResponse;
    use std::sync::Arc;

    fn new_entry(symptome: &str) -> NewDiagnostic {
        NewDiagnostic {
            symptome: Some(symptome.to_string()),
            response: Some(DiagnosticResponse::new("ok", "restarted the service")),
        }
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let log = DiagnosticsLog::new();
        let first = log.append(new_entry("slow list")).unwrap();
        let second = log.append(new_entry("timeout on save")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let log = DiagnosticsLog::new();

        let cases = [
            NewDiagnostic::default(),
            NewDiagnostic {
                symptome: Some("no response".into()),
                response: None,
            },
            NewDiagnostic {
                symptome: None,
                response: Some(DiagnosticResponse::new("ko", "x")),
            },
            NewDiagnostic {
                symptome: Some(String::new()),
                response: Some(DiagnosticResponse::new("ko", "x")),
            },
        ];

        for case in cases {
            assert_eq!(log.append(case), Err(DiagnosticsError::MissingField));
        }
        assert!(log.is_empty());

        // Rejections do not consume ids
        assert_eq!(log.append(new_entry("first real")).unwrap().id, 1);
    }

    #[test]
    fn test_present_but_blank_values_accepted() {
        let log = DiagnosticsLog::new();

        let blank_symptom = log
            .append(NewDiagnostic {
                symptome: Some("   ".into()),
                response: Some(DiagnosticResponse::new("ko", "x")),
            })
            .unwrap();
        assert_eq!(blank_symptom.symptome, "   ");

        let blank_response = log
            .append(NewDiagnostic {
                symptome: Some("empty response".into()),
                response: Some(DiagnosticResponse::default()),
            })
            .unwrap();
        assert_eq!(blank_response.response, DiagnosticResponse::default());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_list_newest_first() {
        let log = DiagnosticsLog::new();
        for i in 0..5 {
            log.append(new_entry(&format!("symptom {i}"))).unwrap();
        }

        let listed = log.list();
        assert_eq!(listed.len(), 5);
        assert_eq!(listed[0].symptome, "symptom 4");
        for pair in listed.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
            assert!(pair[0].id > pair[1].id);
        }
    }

    #[test]
    fn test_concurrent_appends() {
        let log = Arc::new(DiagnosticsLog::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let log = log.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        log.append(new_entry(&format!("t{t}-{i}"))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let listed = log.list();
        assert_eq!(listed.len(), 200);

        let mut ids: Vec<u64> = listed.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=200).collect::<Vec<_>>());

        for pair in listed.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[test]
    fn test_wire_shape() {
        let log = DiagnosticsLog::new();
        let entry = log.append(new_entry("disk full")).unwrap();
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["symptome"], "disk full");
        assert_eq!(json["response"]["status"], "ok");
        assert!(json["createdAt"].is_string());
    }
}
