//! # Locating pipeline code on GitHub
//!
//! [`where_is`] turns a pipeline object (or the name of one) into a markdown
//! hyperlink pointing at its source file, or at a code search over the `lsst`
//! repositories or the `lsst-dm` technotes.
//!
//! ```rust
//! use stackclub::where_is::{where_is, Locatable, SearchPlace};
//!
//! let butler = Locatable::object("lsst.daf.persistence.butler", "Butler");
//! let link = where_is(&butler, SearchPlace::Source, None).unwrap();
//! assert_eq!(
//!     link,
//!     "[`lsst.daf.persistence.butler`](https://github.com/lsst/daf_persistence/blob/master/python/lsst/daf/persistence/butler.py)"
//! );
//! ```
use std::str::FromStr;

use crate::stackclub_errors::StackClubError;

/// What to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locatable {
    /// An object known by its defining module and its own name
    Object { module: String, name: String },
    /// A bare name, e.g. a command line task script
    Name(String),
}

impl Locatable {
    pub fn object(module: &str, name: &str) -> Self {
        Locatable::Object {
            module: module.to_string(),
            name: name.to_string(),
        }
    }

    pub fn name(name: &str) -> Self {
        Locatable::Name(name.to_string())
    }
}

/// Where to look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPlace {
    /// The source file defining the object
    #[default]
    Source,
    /// A code search over the `lsst` organisation
    Repo,
    /// A code search over the `lsst-dm` technotes
    Technotes,
}

impl FromStr for SearchPlace {
    type Err = StackClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "source" => Ok(SearchPlace::Source),
            "repo" => Ok(SearchPlace::Repo),
            "technotes" => Ok(SearchPlace::Technotes),
            other => Err(StackClubError::UnrecognizedSearchPlace(other.to_string())),
        }
    }
}

/// What a bare name is assumed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// A task of `lsst.pipe.tasks`, e.g. `makeDiscreteSkyMap.py`
    CmdLineTask,
}

impl FromStr for ObjectKind {
    type Err = StackClubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cmdlinetask" => Ok(ObjectKind::CmdLineTask),
            other => Err(StackClubError::UnrecognizedObjectKind(other.to_string())),
        }
    }
}

/// Resolve `(module, name)` for a target, guessing the module of a bare name
/// from `assuming_its_a`.
fn resolve(
    target: &Locatable,
    in_the: SearchPlace,
    assuming_its_a: Option<ObjectKind>,
) -> Result<(Option<String>, String), StackClubError> {
    match target {
        Locatable::Object { module, name } => Ok((Some(module.clone()), name.clone())),
        Locatable::Name(name) => match assuming_its_a {
            Some(ObjectKind::CmdLineTask) => {
                let task = name.strip_suffix(".py").unwrap_or(name);
                Ok((Some(format!("lsst.pipe.tasks.{task}")), name.clone()))
            }
            None if in_the == SearchPlace::Source => {
                Err(StackClubError::CannotLocateByName(name.clone()))
            }
            None => Ok((None, name.clone())),
        },
    }
}

/// GitHub URL of the python file defining `module`, for `a.b.c.d` modules.
fn source_url(module: &str) -> Result<String, StackClubError> {
    let pieces: Vec<&str> = module.split('.').collect();
    let [org, pkg, sub, rest @ ..] = pieces.as_slice() else {
        return Err(StackClubError::InvalidModulePath(module.to_string()));
    };
    if rest.is_empty() {
        return Err(StackClubError::InvalidModulePath(module.to_string()));
    }
    Ok(format!(
        "https://github.com/{org}/{pkg}_{sub}/blob/master/python/{org}/{pkg}/{sub}/{}.py",
        rest.join("/")
    ))
}

/// Markdown hyperlink to the code of `target`.
///
/// Arguments
/// -----------------
/// * `target`: the object or name to look for.
/// * `in_the`: the source file, a repository search or a technote search.
/// * `assuming_its_a`: what a bare name is, needed to find its source file.
///
/// Return
/// ----------
/// * The link, also logged at `info`.
/// * [`StackClubError::CannotLocateByName`] for a bare name in the source with no kind,
///   [`StackClubError::InvalidModulePath`] for a module with fewer than 4 components.
pub fn where_is(
    target: &Locatable,
    in_the: SearchPlace,
    assuming_its_a: Option<ObjectKind>,
) -> Result<String, StackClubError> {
    let (module, name) = resolve(target, in_the, assuming_its_a)?;
    let query = urlencoding::encode(&name);

    let link = match in_the {
        SearchPlace::Source => {
            let module = module.ok_or_else(|| StackClubError::CannotLocateByName(name.clone()))?;
            format!("[`{module}`]({})", source_url(&module)?)
        }
        SearchPlace::Repo => format!(
            "[searching for `{name}` in the `lsst` repo](https://github.com/search?l=Python&q=org%3Alsst+{query}&type=Code)"
        ),
        SearchPlace::Technotes => format!(
            "[searching for `{name}` in the `lsst-dm` technotes](https://github.com/search?l=reStructuredText&q=org%3Alsst-dm+{query}&type=Code)"
        ),
    };

    tracing::info!("{link}");
    Ok(link)
}
