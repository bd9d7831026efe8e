use crate::analyzer::model::{DetectedElements, ModuleKind, TableKind};
use crate::synth::ids::IdAllocator;
use crate::synth::test_case::{Category, Priority, TableRef, TestCase};

/// Module links that get a navigation test.
pub const MAX_MODULE_LINKS: usize = 5;

/// Extra functional coverage for one ERP module.
#[derive(Debug, Clone, Copy)]
pub struct ModuleProfile {
    pub id_prefix: &'static str,
    pub nav_priority: Priority,
    pub table: Option<TableProfile>,
}

#[derive(Debug, Clone, Copy)]
pub struct TableProfile {
    pub kind: TableKind,
    pub test_id: &'static str,
    pub test_name: &'static str,
    pub description: &'static str,
    pub priority: Priority,
}

const fn table(
    kind: TableKind,
    test_id: &'static str,
    test_name: &'static str,
    description: &'static str,
    priority: Priority,
) -> Option<TableProfile> {
    Some(TableProfile {
        kind,
        test_id,
        test_name,
        description,
        priority,
    })
}

/// Test prefix, priorities and table check for a module kind.
pub fn profile(kind: ModuleKind) -> ModuleProfile {
    match kind {
        ModuleKind::Student => ModuleProfile {
            id_prefix: "FUNC_STUDENT_",
            nav_priority: Priority::High,
            table: table(
                TableKind::StudentList,
                "FUNC_STUDENT_TABLE_VIEW",
                "Student Table: Verify student list display",
                "Verify student list table displays correctly",
                Priority::Medium,
            ),
        },
        ModuleKind::Teacher => ModuleProfile {
            id_prefix: "FUNC_TEACHER_",
            nav_priority: Priority::Medium,
            table: table(
                TableKind::TeacherList,
                "FUNC_TEACHER_TABLE_VIEW",
                "Teacher Table: Verify staff list display",
                "Verify teacher list table displays correctly",
                Priority::Medium,
            ),
        },
        ModuleKind::Academic => ModuleProfile {
            id_prefix: "FUNC_ACADEMIC_",
            nav_priority: Priority::Medium,
            table: None,
        },
        ModuleKind::Attendance => ModuleProfile {
            id_prefix: "FUNC_ATTENDANCE_",
            nav_priority: Priority::High,
            table: table(
                TableKind::Attendance,
                "FUNC_ATTENDANCE_TABLE_VIEW",
                "Attendance Table: Verify table display",
                "Verify attendance table displays correctly",
                Priority::Medium,
            ),
        },
        ModuleKind::Examination => ModuleProfile {
            id_prefix: "FUNC_EXAM_",
            nav_priority: Priority::High,
            table: table(
                TableKind::Examination,
                "FUNC_EXAM_TABLE_VIEW",
                "Examination Table: Verify results display",
                "Verify examination results table displays correctly",
                Priority::High,
            ),
        },
        ModuleKind::Finance => ModuleProfile {
            id_prefix: "FUNC_FINANCE_",
            nav_priority: Priority::High,
            table: table(
                TableKind::FeeRecord,
                "FUNC_FEE_TABLE_VIEW",
                "Fee Table: Verify fee records display",
                "Verify fee records table displays correctly",
                Priority::High,
            ),
        },
        ModuleKind::Library => ModuleProfile {
            id_prefix: "FUNC_LIBRARY_",
            nav_priority: Priority::Medium,
            table: table(
                TableKind::Library,
                "FUNC_LIBRARY_TABLE_VIEW",
                "Library Table: Verify book records display",
                "Verify library table displays correctly",
                Priority::Medium,
            ),
        },
        ModuleKind::Hostel => ModuleProfile {
            id_prefix: "FUNC_HOSTEL_",
            nav_priority: Priority::Medium,
            table: None,
        },
        ModuleKind::Transport => ModuleProfile {
            id_prefix: "FUNC_TRANSPORT_",
            nav_priority: Priority::Medium,
            table: table(
                TableKind::Transport,
                "FUNC_TRANSPORT_TABLE_VIEW",
                "Transport Table: Verify route records display",
                "Verify transport table displays correctly",
                Priority::Medium,
            ),
        },
        ModuleKind::Report => ModuleProfile {
            id_prefix: "FUNC_REPORT_",
            nav_priority: Priority::Medium,
            table: None,
        },
    }
}

/// Module-specific functional tests: link navigation plus a table check.
pub fn generate(detected: &DetectedElements, ids: &mut IdAllocator) -> Vec<TestCase> {
    let mut cases = Vec::new();

    for module in &detected.modules {
        let profile = profile(module.kind);
        let key = module.kind.key();

        for link in module.links.iter().take(MAX_MODULE_LINKS) {
            cases.push(
                TestCase::new(
                    ids.issue(profile.id_prefix, &link.text),
                    Category::Functional,
                    profile.nav_priority,
                    format!("{} Module: Navigate to {}", module.name, link.text),
                )
                .describe(format!(
                    "Verify navigation to {} in {} module",
                    link.text, module.name
                ))
                .steps([
                    format!("Open the {} module", module.name),
                    format!("Click link: {}", link.text),
                    "Verify page loads without errors".to_string(),
                ])
                .expected(format!(
                    "{} page should open from the {} module",
                    link.text, module.name
                ))
                .link(&link.href)
                .module(key)
                .test_type("navigation"),
            );
        }

        let Some(table_profile) = profile.table else {
            continue;
        };
        let Some(table) = detected
            .table_details
            .iter()
            .find(|t| t.kind == table_profile.kind)
        else {
            continue;
        };
        let mut case = TestCase::new(
            ids.claim(table_profile.test_id.to_string()),
            Category::Functional,
            table_profile.priority,
            table_profile.test_name,
        )
        .describe(table_profile.description)
        .steps([
            format!("Open the {} module", module.name),
            format!("Locate table: {}", table.id),
            "Verify headers and rows are displayed".to_string(),
        ])
        .expected("Table should display records correctly")
        .module(key)
        .test_type("table_validation");
        case.table = Some(TableRef {
            id: table.id.clone(),
            kind: table.kind,
            row_count: table.row_count,
        });
        cases.push(case);
    }

    cases
}
