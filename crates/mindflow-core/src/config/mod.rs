use serde_json::{Map, Value};

/// Editor configuration as a loosely-typed JSON object.
///
/// Consumers read the keys they care about through dotted paths (`layout.columnGap`,
/// `export.padding`, ...). A consumer builds its defaults as a config of its own and layers the
/// user's overrides on top with [`MindflowConfig::merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct MindflowConfig(Value);

impl Default for MindflowConfig {
    fn default() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl MindflowConfig {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(Self(serde_json::from_str(text)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        cur.as_f64()
    }

    /// Writes `value` at `dotted_path`. Intermediate segments that are missing or not objects
    /// become objects.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let nested = dotted_path.rsplit('.').fold(value, |inner, segment| {
            let mut map = Map::new();
            map.insert(segment.to_string(), inner);
            Value::Object(map)
        });
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }
        merge_into(&mut self.0, &nested);
    }

    /// Layers `overrides` on top of this config. Objects combine key by key; any other value in
    /// `overrides` replaces what was there.
    pub fn merge(&mut self, overrides: &MindflowConfig) {
        merge_into(&mut self.0, &overrides.0);
    }
}

fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge_into(base.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
