use std::collections::BTreeMap;

/// How to build and start a program written in one language.
///
/// Commands are argv vectors executed inside the run's workspace directory. A leading
/// `./` in a program name refers to a file inside that workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// File name the source code is written to.
    pub source_file: String,
    /// Compile command; `None` for interpreted languages.
    pub compile: Option<Vec<String>>,
    pub run: Vec<String>,
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

impl Toolchain {
    pub fn compiled(source_file: &str, compile: &[&str], run: &[&str]) -> Self {
        Self {
            source_file: source_file.to_string(),
            compile: Some(argv(compile)),
            run: argv(run),
        }
    }

    pub fn interpreted(source_file: &str, run: &[&str]) -> Self {
        Self {
            source_file: source_file.to_string(),
            compile: None,
            run: argv(run),
        }
    }

    pub fn is_interpreted(&self) -> bool {
        self.compile.is_none()
    }
}

/// Capability table of toolchains keyed by language id (case-insensitive).
#[derive(Debug, Clone)]
pub struct Toolchains {
    entries: BTreeMap<String, Toolchain>,
}

impl Toolchains {
    /// A table with no languages.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace the toolchain for `language`.
    pub fn register(&mut self, language: &str, toolchain: Toolchain) -> &mut Self {
        self.entries.insert(language.to_ascii_lowercase(), toolchain);
        self
    }

    pub fn get(&self, language: &str) -> Option<&Toolchain> {
        self.entries.get(&language.to_ascii_lowercase())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Default for Toolchains {
    fn default() -> Self {
        let mut toolchains = Self::empty();
        toolchains
            .register(
                "java",
                Toolchain::compiled(
                    "Solution.java",
                    &["javac", "Solution.java"],
                    &["java", "-cp", ".", "Solution"],
                ),
            )
            .register(
                "cpp",
                Toolchain::compiled(
                    "main.cpp",
                    &["g++", "-O2", "-std=c++17", "-o", "main", "main.cpp"],
                    &["./main"],
                ),
            )
            .register(
                "c",
                Toolchain::compiled(
                    "main.c",
                    &["gcc", "-O2", "-std=c17", "-o", "main", "main.c"],
                    &["./main"],
                ),
            )
            .register(
                "python",
                Toolchain::interpreted("main.py", &["python3", "main.py"]),
            );
        toolchains
    }
}
