//! Prefix search form.
//!
//! Translates `key=value&...` query strings into the scope and bounding block
//! passed to the store, plus filters applied to the returned prefixes.

use crate::config::parse_flag;
use crate::models::{Block, Prefix, PrefixStatus, Scope};
use regex::{Regex, RegexBuilder};
use std::error::Error;

/// Parsed prefix search parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefixFilter {
    pub scope: Scope,
    /// Only prefixes strictly inside this block.
    pub within: Option<Block>,
    /// Free text, matched case-insensitively.
    pub q: Option<String>,
    /// Any of these statuses; empty means all.
    pub status: Vec<PrefixStatus>,
    pub tenant: Option<String>,
    pub mark_utilized: Option<bool>,
}

impl PrefixFilter {
    /// Parse a query string such as `vrf=red&within=10.0.0.0/8&q=core&status=active`.
    ///
    /// Keys and values are form-urlencoded. `status` may repeat. Unknown keys are ignored with a warning; bad
    /// values are errors.
    pub fn from_query(query: &str) -> Result<PrefixFilter, Box<dyn Error>> {
        let mut filter = PrefixFilter::default();
        let query = query.trim().trim_start_matches('?');

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let key = key.trim();
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            match key {
                "vrf" => filter.scope = Scope::parse(&value),
                "within" => {
                    filter.within = Some(
                        Block::new(&value).map_err(|e| format!("Invalid 'within' value: {e}"))?,
                    )
                }
                "q" => filter.q = Some(value),
                "status" => {
                    for status in value.split(',') {
                        let parsed = PrefixStatus::parse(status)
                            .ok_or_else(|| format!("Invalid 'status' value: {status}"))?;
                        if !filter.status.contains(&parsed) {
                            filter.status.push(parsed);
                        }
                    }
                }
                "tenant" => filter.tenant = Some(value),
                "mark_utilized" => {
                    filter.mark_utilized = Some(parse_flag(&value).ok_or_else(|| {
                        format!("Invalid 'mark_utilized' value: {value}")
                    })?)
                }
                _ => log::warn!("Ignoring unknown filter key '{key}'"),
            }
        }
        log::debug!("Parsed prefix filter {:?}", filter);
        Ok(filter)
    }

    /// Compiled free-text matcher, `None` when no text was given.
    pub fn search_regex(&self) -> Result<Option<Regex>, regex::Error> {
        self.q
            .as_deref()
            .map(|q| {
                RegexBuilder::new(&regex::escape(q))
                    .case_insensitive(true)
                    .build()
            })
            .transpose()
    }

    /// True if the prefix passes every filter except scope and `within`.
    pub fn matches(&self, prefix: &Prefix, search: Option<&Regex>) -> bool {
        if !self.status.is_empty() && !self.status.contains(&prefix.status) {
            return false;
        }
        if let Some(tenant) = &self.tenant {
            if prefix.tenant.as_ref() != Some(tenant) {
                return false;
            }
        }
        if let Some(mark_utilized) = self.mark_utilized {
            if prefix.mark_utilized != mark_utilized {
                return false;
            }
        }
        match search {
            Some(re) => {
                re.is_match(&prefix.prefix.to_string())
                    || searchable_fields(prefix).any(|field| re.is_match(field))
            }
            None => true,
        }
    }

    /// Keep the prefixes that pass [`PrefixFilter::matches`].
    pub fn apply(&self, prefixes: Vec<Prefix>) -> Result<Vec<Prefix>, Box<dyn Error>> {
        let search = self.search_regex()?;
        let total = prefixes.len();
        let kept: Vec<Prefix> = prefixes
            .into_iter()
            .filter(|p| self.matches(p, search.as_ref()))
            .collect();
        log::info!("Filter kept {} of {} prefixes", kept.len(), total);
        Ok(kept)
    }
}

fn searchable_fields(prefix: &Prefix) -> impl Iterator<Item = &str> {
    let optional = [&prefix.role, &prefix.tenant, &prefix.site, &prefix.vlan]
        .into_iter()
        .filter_map(|f| f.as_deref());
    std::iter::once(prefix.description.as_str())
        .chain(optional)
        .chain(prefix.tags.iter().map(String::as_str))
}
