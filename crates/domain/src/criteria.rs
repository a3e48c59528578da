// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::lead::Lead;
use crate::types::Gender;

/// Selection constraints applied when an order pulls leads.
///
/// Built once per request through [`SelectionCriteriaBuilder`] and never
/// mutated afterwards. The same value is persisted with the order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionCriteria {
    country: Option<String>,
    gender: Option<Gender>,
    excluded_clients: BTreeSet<String>,
    excluded_brokers: BTreeSet<String>,
    excluded_networks: BTreeSet<String>,
}

impl SelectionCriteria {
    /// Starts building a criteria value.
    #[must_use]
    pub fn builder() -> SelectionCriteriaBuilder {
        SelectionCriteriaBuilder::default()
    }

    /// Country substring filter (matched case-insensitively).
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Exact gender filter.
    #[must_use]
    pub const fn gender(&self) -> Option<Gender> {
        self.gender
    }

    /// Client labels a claimed lead must not carry.
    #[must_use]
    pub const fn excluded_clients(&self) -> &BTreeSet<String> {
        &self.excluded_clients
    }

    /// Broker labels a claimed lead must not carry.
    #[must_use]
    pub const fn excluded_brokers(&self) -> &BTreeSet<String> {
        &self.excluded_brokers
    }

    /// Network labels a claimed lead must not carry.
    #[must_use]
    pub const fn excluded_networks(&self) -> &BTreeSet<String> {
        &self.excluded_networks
    }

    /// Evaluates the criteria against a lead.
    ///
    /// Assignment state and lead type are not part of the criteria; the
    /// allocator applies those per bucket.
    #[must_use]
    pub fn matches(&self, lead: &Lead) -> bool {
        let country_ok: bool = self.country.as_ref().is_none_or(|country| {
            lead.country
                .to_lowercase()
                .contains(&country.to_lowercase())
        });
        if !country_ok {
            return false;
        }

        if self.gender.is_some_and(|gender| lead.gender != gender) {
            return false;
        }

        !(is_excluded(&self.excluded_clients, lead.client.as_deref())
            || is_excluded(&self.excluded_brokers, lead.client_broker.as_deref())
            || is_excluded(&self.excluded_networks, lead.client_network.as_deref()))
    }
}

fn is_excluded(excluded: &BTreeSet<String>, label: Option<&str>) -> bool {
    label.is_some_and(|l| excluded.contains(l))
}

/// Builder for [`SelectionCriteria`].
///
/// Blank strings are ignored so that empty form fields never become filters.
#[derive(Debug, Clone, Default)]
pub struct SelectionCriteriaBuilder {
    inner: SelectionCriteria,
}

impl SelectionCriteriaBuilder {
    /// Restricts allocation to countries containing `country`.
    #[must_use]
    pub fn country(mut self, country: Option<&str>) -> Self {
        self.inner.country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from);
        self
    }

    /// Restricts allocation to one gender.
    #[must_use]
    pub const fn gender(mut self, gender: Option<Gender>) -> Self {
        self.inner.gender = gender;
        self
    }

    /// Excludes leads carrying any of these client labels.
    #[must_use]
    pub fn exclude_clients<I, S>(mut self, clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_trimmed(&mut self.inner.excluded_clients, clients);
        self
    }

    /// Excludes leads carrying any of these broker labels.
    #[must_use]
    pub fn exclude_brokers<I, S>(mut self, brokers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_trimmed(&mut self.inner.excluded_brokers, brokers);
        self
    }

    /// Excludes leads carrying any of these network labels.
    #[must_use]
    pub fn exclude_networks<I, S>(mut self, networks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        extend_trimmed(&mut self.inner.excluded_networks, networks);
        self
    }

    /// Finishes the criteria.
    #[must_use]
    pub fn build(self) -> SelectionCriteria {
        self.inner
    }
}

fn extend_trimmed<I, S>(set: &mut BTreeSet<String>, values: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    set.extend(
        values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty()),
    );
}
