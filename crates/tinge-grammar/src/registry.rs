//! Registry of available grammars.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::{Grammar, GrammarError, GrammarOverride, GrammarResult, Language};

/// Grammar registry keyed by name and file extension.
///
/// Later registrations shadow earlier ones, so a custom grammar that claims
/// `h` takes precedence over the built-in C grammar.
#[derive(Debug, Clone, Default)]
pub struct GrammarRegistry {
    grammars: Vec<Arc<Grammar>>,
}

impl GrammarRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the C and C++ grammars.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for language in Language::ALL {
            if let Some(grammar) = Grammar::builtin(language) {
                registry.grammars.push(grammar);
            }
        }
        registry
    }

    /// Adds a grammar, replacing any grammar with the same name.
    pub fn register(&mut self, grammar: Grammar) -> GrammarResult<()> {
        grammar.validate()?;
        self.grammars.retain(|g| g.name != grammar.name);
        tracing::debug!(
            "Registered grammar '{}' for {:?}",
            grammar.name,
            grammar.extensions
        );
        self.grammars.push(Arc::new(grammar));
        Ok(())
    }

    /// Loads every `*.toml` grammar in a directory.
    ///
    /// Files that fail to parse or validate are logged and skipped. Returns
    /// the number of grammars registered.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> GrammarResult<usize> {
        let dir = dir.as_ref();
        let io_err = |source| GrammarError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match Grammar::load(&path).and_then(|grammar| self.register(grammar)) {
                Ok(()) => loaded += 1,
                Err(e) => tracing::warn!("Skipping grammar {}: {}", path.display(), e),
            }
        }
        tracing::info!("Loaded {} grammar(s) from {}", loaded, dir.display());
        Ok(loaded)
    }

    /// Applies per-language additions, keyed by grammar name.
    ///
    /// Keys are resolved like [`by_name`](Self::by_name), so `C++` and `cxx`
    /// both target the `cpp` grammar.
    pub fn apply_overrides(
        &mut self,
        overrides: &HashMap<String, GrammarOverride>,
    ) -> GrammarResult<()> {
        for (name, extra) in overrides {
            let canonical = canonical_name(name);
            let grammar = self
                .grammars
                .iter_mut()
                .rev()
                .find(|g| g.name.eq_ignore_ascii_case(canonical))
                .ok_or_else(|| GrammarError::UnknownGrammar(name.clone()))?;
            Arc::make_mut(grammar).apply(extra);
        }
        Ok(())
    }

    /// Finds a grammar by name.
    pub fn by_name(&self, name: &str) -> Option<Arc<Grammar>> {
        let name = canonical_name(name);
        self.grammars
            .iter()
            .rev()
            .find(|g| g.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Finds the grammar claiming a file extension.
    pub fn for_extension(&self, ext: &str) -> Option<Arc<Grammar>> {
        self.grammars
            .iter()
            .rev()
            .find(|g| g.handles_extension(ext))
            .cloned()
    }

    /// Finds the grammar for a path by its extension.
    pub fn for_path(&self, path: impl AsRef<Path>) -> Option<Arc<Grammar>> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.for_extension(ext))
    }

    /// Returns registered grammar names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.grammars.iter().map(|g| g.name.as_str()).collect()
    }
}

/// Maps language aliases (`C++`, `cxx`, `plain`) to grammar names.
fn canonical_name(name: &str) -> &str {
    Language::from_name(name).map_or(name, |language| language.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = GrammarRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["c", "cpp"]);
        assert_eq!(registry.for_extension("hpp").unwrap().name, "cpp");
        assert_eq!(registry.for_path("lib/util.h").unwrap().name, "c");
        assert_eq!(registry.by_name("C++").unwrap().name, "cpp");
        assert!(registry.for_extension("rs").is_none());
    }

    #[test]
    fn test_custom_grammar_shadows_builtin() {
        let mut registry = GrammarRegistry::with_builtins();
        registry
            .register(Grammar {
                name: "objc".to_string(),
                extensions: vec!["h".to_string(), "m".to_string()],
                ..Grammar::c()
            })
            .unwrap();

        assert_eq!(registry.for_extension("h").unwrap().name, "objc");
        assert_eq!(registry.for_extension("c").unwrap().name, "c");
    }

    #[test]
    fn test_apply_overrides() {
        let mut registry = GrammarRegistry::with_builtins();
        let mut overrides = HashMap::new();
        overrides.insert(
            "c".to_string(),
            GrammarOverride {
                types: vec!["gboolean".to_string()],
                ..Default::default()
            },
        );
        registry.apply_overrides(&overrides).unwrap();
        assert!(registry.by_name("c").unwrap().types.contains("gboolean"));
        // The shared built-in is untouched
        assert!(!Grammar::builtin(Language::C).unwrap().types.contains("gboolean"));

        overrides.insert("cobol".to_string(), GrammarOverride::default());
        assert!(matches!(
            registry.apply_overrides(&overrides),
            Err(GrammarError::UnknownGrammar(name)) if name == "cobol"
        ));
    }

    #[test]
    fn test_override_keys_accept_aliases() {
        let mut registry = GrammarRegistry::with_builtins();
        let mut overrides = HashMap::new();
        overrides.insert(
            "C++".to_string(),
            GrammarOverride {
                types: vec!["QString".to_string()],
                ..Default::default()
            },
        );
        overrides.insert(
            "C".to_string(),
            GrammarOverride {
                null_literals: vec!["nil".to_string()],
                ..Default::default()
            },
        );
        registry.apply_overrides(&overrides).unwrap();

        assert!(registry.by_name("cpp").unwrap().types.contains("QString"));
        assert!(registry.by_name("c").unwrap().null_literals.contains("nil"));
        assert!(!registry.by_name("c").unwrap().types.contains("QString"));
    }

    #[test]
    fn test_load_dir_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("glsl.toml"),
            "name = \"glsl\"\nextensions = [\"frag\"]\ntypes = [\"vec4\"]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "name = [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = GrammarRegistry::with_builtins();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);
        assert_eq!(registry.for_extension("frag").unwrap().name, "glsl");
    }

    #[test]
    fn test_load_dir_missing() {
        let mut registry = GrammarRegistry::new();
        let result = registry.load_dir("/definitely/not/here");
        assert!(matches!(result, Err(GrammarError::Io { .. })));
    }
}
