use serde::{Deserialize, Serialize};

use crate::config::FOUNDING_CREWS;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrewId(pub String);

impl CrewId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Crew {
    pub id: CrewId,
    pub name: String,
    pub description: String,
    pub home_beach: String,
    pub members: u32,
    pub events: u32,
    pub impact: String,
}

/// Crews shown in the "My Crews" list. Starts with the founding crews;
/// crews created in this session are appended.
#[derive(Debug, Clone, PartialEq)]
pub struct CrewRoster {
    crews: Vec<Crew>,
}

impl Default for CrewRoster {
    fn default() -> Self {
        let mut roster = Self { crews: Vec::new() };
        for &(name, description, home_beach, members, events, impact) in FOUNDING_CREWS {
            let id = roster.unique_id(name);
            roster.crews.push(Crew {
                id,
                name: name.to_string(),
                description: description.to_string(),
                home_beach: home_beach.to_string(),
                members,
                events,
                impact: impact.to_string(),
            });
        }
        roster
    }
}

impl CrewRoster {
    pub fn iter(&self) -> impl Iterator<Item = &Crew> {
        self.crews.iter()
    }

    pub fn len(&self) -> usize {
        self.crews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crews.is_empty()
    }

    pub fn get(&self, id: &CrewId) -> Option<&Crew> {
        self.crews.iter().find(|crew| &crew.id == id)
    }

    /// Register a freshly created crew with its founder as the only member.
    pub fn create(&mut self, name: &str, description: &str, home_beach: &str) -> CrewId {
        let name = name.trim();
        let id = self.unique_id(name);
        self.crews.push(Crew {
            id: id.clone(),
            name: name.to_string(),
            description: description.trim().to_string(),
            home_beach: home_beach.trim().to_string(),
            members: 1,
            events: 0,
            impact: "No cleanups yet".to_string(),
        });
        id
    }

    fn unique_id(&self, name: &str) -> CrewId {
        let base = slugify(name);
        let base = if base.is_empty() {
            "crew".to_string()
        } else {
            base
        };
        let taken = |candidate: &str| self.crews.iter().any(|c| c.id.0 == candidate);
        if !taken(&base) {
            return CrewId(base);
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !taken(&candidate) {
                return CrewId(candidate);
            }
            n += 1;
        }
    }
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_starts_with_founding_crews() {
        let roster = CrewRoster::default();
        let names: Vec<&str> = roster.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Founding Crew", "East Coast Squad"]);
        assert_eq!(roster.iter().next().unwrap().id, CrewId("founding-crew".into()));
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("  Tidal -- Force! "), "tidal-force");
        assert_eq!(slugify("Sentosa 2025"), "sentosa-2025");
        assert_eq!(slugify("\u{1F30A}"), "");
    }

    #[test]
    fn created_crew_ids_are_unique() {
        let mut roster = CrewRoster::default();
        let a = roster.create("Founding Crew", "again", "Pasir Ris");
        let b = roster.create("Founding Crew", "and again", "Pasir Ris");
        assert_eq!(a, CrewId("founding-crew-2".into()));
        assert_eq!(b, CrewId("founding-crew-3".into()));
        assert_eq!(roster.len(), 4);
    }

    #[test]
    fn created_crew_is_trimmed_and_has_one_member() {
        let mut roster = CrewRoster::default();
        let id = roster.create("  Reef Rangers ", " Saturday mornings ", " Changi ");
        let crew = roster.get(&id).unwrap();
        assert_eq!(crew.name, "Reef Rangers");
        assert_eq!(crew.description, "Saturday mornings");
        assert_eq!(crew.home_beach, "Changi");
        assert_eq!(crew.members, 1);
    }

    #[test]
    fn unnamed_crew_gets_fallback_slug() {
        let mut roster = CrewRoster::default();
        assert_eq!(roster.create("!!!", "", ""), CrewId("crew".into()));
    }
}
