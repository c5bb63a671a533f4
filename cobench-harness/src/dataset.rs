use anyhow::{anyhow, Context, Result};
use cobench_problems::ConstructiveProblem;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// One dataset entry: either a loaded instance, or the parse failure that
/// keeps it from loading. Parse failures are carried along instead of
/// aborting the run; the runner charges them the penalty.
pub struct BenchmarkInstance<P: ConstructiveProblem> {
    pub label: String,
    pub case: Result<Arc<P::Instance>, String>,
}

/// Read every instance in `path` (a single file or a directory of files).
/// Files are visited in lexicographic order so the aggregate mean is
/// computed over a stable instance ordering.
///
/// Only a missing path is an error here: that is a configuration problem
/// detected before any instance is attempted.
pub fn load_dataset<P: ConstructiveProblem>(path: &Path) -> Result<Vec<BenchmarkInstance<P>>> {
    let mut files = Vec::new();
    if path.is_dir() {
        let entries = fs::read_dir(path)
            .with_context(|| format!("failed to read dataset directory {}", path.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read dataset directory {}", path.display()))?;
            if entry.path().is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        return Err(anyhow!("dataset path {} does not exist", path.display()));
    }

    let mut dataset = Vec::new();
    for file in files {
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.display().to_string());
        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) => {
                warn!(file = %file.display(), "unreadable instance file: {}", e);
                dataset.push(BenchmarkInstance {
                    label: stem,
                    case: Err(format!("unreadable file: {}", e)),
                });
                continue;
            }
        };
        match P::parse_instances(&text) {
            Ok(instances) => {
                let many = instances.len() > 1;
                for (idx, instance) in instances.into_iter().enumerate() {
                    let label = P::instance_label(&instance).unwrap_or_else(|| {
                        if many {
                            format!("{}#{}", stem, idx)
                        } else {
                            stem.clone()
                        }
                    });
                    dataset.push(BenchmarkInstance {
                        label,
                        case: Ok(Arc::new(instance)),
                    });
                }
            }
            Err(e) => {
                warn!(file = %file.display(), "malformed instance file: {}", e);
                dataset.push(BenchmarkInstance {
                    label: stem,
                    case: Err(e.to_string()),
                });
            }
        }
    }
    Ok(dataset)
}
