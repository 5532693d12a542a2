const CSV_SUFFIX: &str = ".csv";

/// Raw upload as handed over by the transport. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    // Exact, case-sensitive suffix match: `data.CSV` is rejected.
    pub fn has_csv_extension(&self) -> bool {
        self.filename.ends_with(CSV_SUFFIX)
    }
}
