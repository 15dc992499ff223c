/// One decoder benchmark: a captured request, optionally repeated back to back the way a
/// pipelining client sends it.
#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
    requests: usize,
}

impl TestCase {
    pub fn single(name: &'static str, file: TestFile) -> Self {
        Self { name, file, requests: 1 }
    }

    pub fn pipelined(name: &'static str, file: TestFile, requests: usize) -> Self {
        Self { name, file, requests }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    /// Number of requests in [`input`](Self::input).
    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn input(&self) -> Vec<u8> {
        self.file.content().as_bytes().repeat(self.requests)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}
