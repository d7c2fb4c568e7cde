//! Shared context passed to modules

/// Identifies the dataset the dashboard is working on.
///
/// Both fields are empty until a dataset is uploaded or bound explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataContext {
    pub file_id: String,
    pub filename: String,
}

static UNBOUND: DataContext = DataContext {
    file_id: String::new(),
    filename: String::new(),
};

impl DataContext {
    pub fn new(file_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            filename: filename.into(),
        }
    }

    /// True when both the id and the filename are present
    pub fn is_bound(&self) -> bool {
        !self.file_id.is_empty() && !self.filename.is_empty()
    }

    /// Query pairs the backend expects on every dataset endpoint
    pub fn query(&self) -> [(&'static str, &str); 2] {
        [
            ("file_id", self.file_id.as_str()),
            ("filename", self.filename.as_str()),
        ]
    }
}

/// Provider for a [`DataContext`].
///
/// An unbound scope reads as the empty context. Values are fixed at
/// construction; rebinding means building a new scope.
#[derive(Debug, Clone, Default)]
pub struct DataScope {
    bound: Option<DataContext>,
}

impl DataScope {
    pub fn unbound() -> Self {
        Self { bound: None }
    }

    pub fn provide(file_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bound: Some(DataContext::new(file_id, filename)),
        }
    }

    /// Nearest bound value, or the empty default
    pub fn data(&self) -> &DataContext {
        self.bound.as_ref().unwrap_or(&UNBOUND)
    }

    pub fn is_provided(&self) -> bool {
        self.bound.is_some()
    }
}

/// Shared context available to all modules
#[derive(Debug, Default)]
pub struct Context {
    data: DataScope,

    /// Backend base URL display string
    pub api_endpoint: String,

    /// Last reported backend health ("healthy", "unreachable", ...)
    pub backend_status: String,
}

impl Context {
    pub fn new(api_endpoint: impl Into<String>) -> Self {
        Self {
            data: DataScope::unbound(),
            api_endpoint: api_endpoint.into(),
            backend_status: String::new(),
        }
    }

    pub fn data(&self) -> &DataContext {
        self.data.data()
    }

    /// Replace the bound dataset wholesale
    pub fn mount_dataset(&mut self, file_id: impl Into<String>, filename: impl Into<String>) {
        self.data = DataScope::provide(file_id, filename);
    }

    pub fn scope(&self) -> &DataScope {
        &self.data
    }
}
