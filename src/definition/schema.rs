//! Definition validation
//!
//! Checks the name-table integrity of a parsed definition.

use crate::definition::types::TargetTable;
use crate::error::{DefinitionError, DefinitionResult};

/// Validate a complete target table
pub fn validate_table(table: &TargetTable) -> DefinitionResult<()> {
    if table.is_empty() {
        return Err(DefinitionError::Empty);
    }

    for target in table.iter() {
        for dep in &target.dependencies {
            if !table.contains(dep) {
                return Err(DefinitionError::UnknownTarget {
                    name: dep.clone(),
                    line: target.line,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::types::TargetDefinition;

    #[test]
    fn test_valid_table() {
        let table: TargetTable = vec![
            TargetDefinition::new("fetch", 1),
            TargetDefinition::new("build", 3).with_dependencies(["fetch"]),
        ]
        .into_iter()
        .collect();

        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_unresolved_dependency() {
        let table: TargetTable = vec![TargetDefinition::new("build", 7).with_dependencies(["fetch"])]
            .into_iter()
            .collect();

        assert_eq!(
            validate_table(&table),
            Err(DefinitionError::UnknownTarget {
                name: "fetch".to_string(),
                line: 7,
            })
        );
    }

    #[test]
    fn test_self_dependency_is_left_to_the_resolver() {
        let table: TargetTable = vec![TargetDefinition::new("loop", 1).with_dependencies(["loop"])]
            .into_iter()
            .collect();

        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(validate_table(&TargetTable::new()), Err(DefinitionError::Empty));
    }
}
