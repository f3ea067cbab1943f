use serde_json::Value;

/// Predicate over stored documents, evaluated in memory or rendered to SQL over a jsonb column
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Top-level string field equals `value` exactly
    Equals { field: &'static str, value: String },
    /// Top-level string array contains `value`
    Contains { field: &'static str, value: String },
    /// Case-insensitive substring match on any of `fields`; array fields match on any element
    Search { fields: &'static [&'static str], term: String },
}

impl Filter {
    pub fn equals(field: &'static str, value: impl Into<String>) -> Self {
        Filter::Equals { field, value: value.into() }
    }

    pub fn contains(field: &'static str, value: impl Into<String>) -> Self {
        Filter::Contains { field, value: value.into() }
    }

    pub fn search(fields: &'static [&'static str], term: impl Into<String>) -> Self {
        Filter::Search { fields, term: term.into() }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Equals { field, value } => doc.get(*field).and_then(Value::as_str) == Some(value.as_str()),
            Filter::Contains { field, value } => doc
                .get(*field)
                .and_then(Value::as_array)
                .map(|items| items.iter().any(|item| item.as_str() == Some(value.as_str())))
                .unwrap_or(false),
            Filter::Search { fields, term } => {
                let needle = term.to_lowercase();
                fields.iter().any(|field| match doc.get(*field) {
                    Some(Value::String(s)) => s.to_lowercase().contains(&needle),
                    Some(Value::Array(items)) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .any(|s| s.to_lowercase().contains(&needle)),
                    _ => false,
                })
            }
        }
    }

    /// Render a WHERE predicate over `doc`, pushing bind values onto `params`.
    ///
    /// Placeholders are numbered after whatever `params` already holds. Field names
    /// come from compile-time constants and are never taken from client input.
    pub fn to_sql(&self, params: &mut Vec<String>) -> String {
        match self {
            Filter::All => "TRUE".to_string(),
            Filter::Equals { field, value } => {
                params.push(value.clone());
                format!("doc->>'{}' = ${}", field, params.len())
            }
            Filter::Contains { field, value } => {
                params.push(value.clone());
                format!("doc->'{}' @> jsonb_build_array(${}::text)", field, params.len())
            }
            Filter::Search { fields, term } => {
                params.push(format!("%{}%", escape_like(term)));
                let n = params.len();
                let parts: Vec<String> = fields
                    .iter()
                    .map(|field| {
                        format!(
                            "(CASE WHEN jsonb_typeof(doc->'{f}') = 'array' \
                             THEN EXISTS (SELECT 1 FROM jsonb_array_elements_text(doc->'{f}') AS e(v) WHERE e.v ILIKE ${n}) \
                             ELSE COALESCE(doc->>'{f}', '') ILIKE ${n} END)",
                            f = field,
                            n = n
                        )
                    })
                    .collect();
                if parts.is_empty() {
                    "FALSE".to_string()
                } else {
                    format!("({})", parts.join(" OR "))
                }
            }
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Filter plus window; results are always newest first
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub filter: Filter,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn all() -> Self {
        Self::filtered(Filter::All)
    }

    pub fn filtered(filter: Filter) -> Self {
        Self { filter, skip: 0, limit: None }
    }

    pub fn window(mut self, skip: u64, limit: u64) -> Self {
        self.skip = skip;
        self.limit = Some(limit);
        self
    }
}
