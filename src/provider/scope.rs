//! Identifying parameters the platform passes alongside every callback.

/// Identity of the resource a callback refers to.
///
/// Bound from query string pairs. Keys match case-insensitively, empty
/// values are treated as absent, and the first non-empty value of a repeated
/// key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceScope {
    /// Subscription the resource lives in.
    pub subscription_id: Option<String>,
    /// Resource group name.
    pub resource_group: Option<String>,
    /// Provider namespace, e.g. `Microsoft.Contoso`.
    pub provider_namespace: Option<String>,
    /// Resource type within the namespace.
    pub resource_type: Option<String>,
    /// Name of the resource instance.
    pub resource_type_name: Option<String>,
}

impl ResourceScope {
    /// Bind the identifying parameters from key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut scope = Self::default();
        for (key, value) in pairs {
            let Some(slot) = scope.slot_mut(key.as_ref()) else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(value.into()).filter(|v| !v.is_empty());
            }
        }
        scope
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        [
            ("subscriptionId", &mut self.subscription_id),
            ("resourceGroup", &mut self.resource_group),
            ("providerNamespace", &mut self.provider_namespace),
            ("resourceType", &mut self.resource_type),
            ("resourceTypeName", &mut self.resource_type_name),
        ]
        .into_iter()
        .find(|(name, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, slot)| slot)
    }

    /// Wire names of the parameters that were not supplied.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("subscriptionId", &self.subscription_id),
            ("resourceGroup", &self.resource_group),
            ("providerNamespace", &self.provider_namespace),
            ("resourceType", &self.resource_type),
            ("resourceTypeName", &self.resource_type_name),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Whether all five identifying parameters are present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
