// Program Loader
//
// Builds an `InMemoryProgram` from every TypeScript file below a directory.

use super::in_memory::InMemoryProgram;
use super::oxc_frontend::parse_source_file;
use crate::ngtsc::file_system::{clean_path, normalize_separators};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse all `*.ts` files under `root` (including `node_modules`), in path order.
pub fn load_program(root: impl AsRef<Path>) -> Result<InMemoryProgram> {
    let root = root.as_ref();
    let root_name = clean_path(&normalize_separators(&root.to_string_lossy()));
    let pattern = format!("{}/**/*.ts", root_name);

    let mut paths = glob::glob(&pattern)
        .with_context(|| format!("invalid source pattern '{}'", pattern))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list sources under {}", root.display()))?;
    paths.sort();

    let mut program = InMemoryProgram::default();
    for path in paths {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_name = clean_path(&normalize_separators(&path.to_string_lossy()));
        program.add_file(parse_source_file(&file_name, &text)?);
    }
    Ok(program)
}
