//! Boundary registry and membership: maps absolute paths to boundaries.

use std::path::{Path, PathBuf};

use crate::config::{BoundaryConfig, BoundaryDef};
use crate::paths::{join_spec, normalize};

/// One architectural zone, with its directory resolved against the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Directory relative to the root dir (e.g. `domain/queries`).
    pub dir: String,
    /// Import alias (e.g. `@queries`).
    pub alias: String,
    /// Absolute, normalized directory. No trailing slash.
    pub abs_dir: PathBuf,
    /// Aliases this boundary may import from.
    pub allow_imports_from: Vec<String>,
    /// Aliases this boundary may import from with type-only imports.
    pub allow_type_imports_from: Vec<String>,
}

impl Boundary {
    /// Builds a boundary rooted at `root_abs_dir`.
    #[must_use]
    pub fn new(def: &BoundaryDef, root_abs_dir: &Path) -> Self {
        let joined = root_abs_dir.join(&def.dir);
        Self {
            dir: def.dir.clone(),
            alias: def.alias.clone(),
            abs_dir: normalize(&joined).unwrap_or(joined),
            allow_imports_from: def.allow_imports_from.clone(),
            allow_type_imports_from: def.allow_type_imports_from.clone(),
        }
    }

    /// Whether value imports from `alias` are allowed.
    #[must_use]
    pub fn allows(&self, alias: &str) -> bool {
        self.allow_imports_from.iter().any(|a| a == alias)
    }

    /// Whether type-only imports from `alias` are allowed in addition.
    #[must_use]
    pub fn allows_types(&self, alias: &str) -> bool {
        self.allow_type_imports_from.iter().any(|a| a == alias)
    }

    /// Whether `abs_path` lies inside this boundary (component-wise).
    #[must_use]
    pub fn contains(&self, abs_path: &Path) -> bool {
        abs_path.starts_with(&self.abs_dir)
    }
}

/// Finds the most specific boundary containing `abs_path`.
///
/// Nested boundaries are allowed; the one with the deepest directory wins
/// regardless of declaration order.
#[must_use]
pub fn find_boundary_for<'a>(abs_path: &Path, boundaries: &'a [Boundary]) -> Option<&'a Boundary> {
    boundaries
        .iter()
        .filter(|b| b.contains(abs_path))
        .fold(None, |best: Option<&Boundary>, b| match best {
            Some(current) if current.abs_dir.components().count() >= b.abs_dir.components().count() => {
                Some(current)
            }
            _ => Some(b),
        })
}

/// Immutable set of boundaries plus the roots they were resolved against.
#[derive(Debug, Clone)]
pub struct BoundaryRegistry {
    project_root: PathBuf,
    root_dir: String,
    root_abs_dir: PathBuf,
    boundaries: Vec<Boundary>,
}

impl BoundaryRegistry {
    /// Builds the registry from config, resolving dirs under
    /// `project_root/settings.root_dir`.
    #[must_use]
    pub fn new(config: &BoundaryConfig, project_root: &Path) -> Self {
        let project_root = normalize(project_root).unwrap_or_else(|| project_root.to_path_buf());
        let root_dir = config.settings.root_dir.clone();
        let root_abs_dir = if root_dir.is_empty() {
            project_root.clone()
        } else {
            project_root.join(&root_dir)
        };
        let boundaries = config
            .boundaries
            .iter()
            .map(|def| Boundary::new(def, &root_abs_dir))
            .collect();
        Self {
            project_root,
            root_dir,
            root_abs_dir,
            boundaries,
        }
    }

    /// All boundaries, in declaration order.
    #[must_use]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Absolute project root; absolute-style specifiers are joined onto it.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Root dir as configured (e.g. `src`), possibly empty.
    #[must_use]
    pub fn root_dir(&self) -> &str {
        &self.root_dir
    }

    /// Absolute path of the root dir.
    #[must_use]
    pub fn root_abs_dir(&self) -> &Path {
        &self.root_abs_dir
    }

    /// Looks a boundary up by alias.
    #[must_use]
    pub fn by_alias(&self, alias: &str) -> Option<&Boundary> {
        self.boundaries.iter().find(|b| b.alias == alias)
    }

    /// Boundary whose alias prefixes `specifier` (`@q` or `@q/...`),
    /// longest alias first.
    #[must_use]
    pub fn alias_for_specifier(&self, specifier: &str) -> Option<&Boundary> {
        self.boundaries
            .iter()
            .filter(|b| {
                specifier == b.alias
                    || specifier
                        .strip_prefix(b.alias.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .max_by_key(|b| b.alias.len())
    }

    /// Most specific boundary containing `abs_path`.
    #[must_use]
    pub fn find_boundary_for(&self, abs_path: &Path) -> Option<&Boundary> {
        find_boundary_for(abs_path, &self.boundaries)
    }

    /// Root-relative spelling of a boundary (`src/domain/queries`).
    #[must_use]
    pub fn absolute_spec(&self, boundary: &Boundary) -> String {
        join_spec(&self.root_dir, &boundary.dir)
    }
}
