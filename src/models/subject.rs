// src/models/subject.rs

use serde::Serialize;

/// One unit of a course. Questions are tagged with the unit's section code.
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub number: u32,
    pub section_code: &'static str,
    pub name: &'static str,
    /// Share of the multiple-choice section, in percent (low, high).
    pub weight_min: f32,
    pub weight_max: f32,
}

/// Multiple-choice section format of the real exam.
#[derive(Debug, Clone, Serialize)]
pub struct ExamFormat {
    pub mcq_questions: u32,
    pub mcq_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub exam: ExamFormat,
    pub units: &'static [Unit],
}

/// Summary used by the subject listing.
#[derive(Debug, Serialize)]
pub struct SubjectSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub unit_count: usize,
}

impl Subject {
    pub fn unit_for_section(&self, section_code: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.section_code == section_code)
    }

    pub fn summary(&self) -> SubjectSummary {
        SubjectSummary {
            id: self.id,
            name: self.name,
            unit_count: self.units.len(),
        }
    }
}

/// Looks up a subject by its id (e.g. `ap-calculus-ab`).
pub fn find_subject(id: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.id == id)
}

pub fn all_subjects() -> &'static [Subject] {
    SUBJECTS
}

macro_rules! unit {
    ($n:expr, $code:expr, $name:expr, $lo:expr, $hi:expr) => {
        Unit {
            number: $n,
            section_code: $code,
            name: $name,
            weight_min: $lo,
            weight_max: $hi,
        }
    };
}

static SUBJECTS: &[Subject] = &[
    Subject {
        id: "ap-calculus-ab",
        name: "AP Calculus AB",
        exam: ExamFormat { mcq_questions: 45, mcq_minutes: 105 },
        units: &[
            unit!(1, "unit-1", "Limits and Continuity", 10.0, 12.0),
            unit!(2, "unit-2", "Differentiation: Definition and Fundamental Properties", 10.0, 12.0),
            unit!(3, "unit-3", "Differentiation: Composite, Implicit, and Inverse Functions", 9.0, 13.0),
            unit!(4, "unit-4", "Contextual Applications of Differentiation", 10.0, 15.0),
            unit!(5, "unit-5", "Analytical Applications of Differentiation", 15.0, 18.0),
            unit!(6, "unit-6", "Integration and Accumulation of Change", 17.0, 20.0),
            unit!(7, "unit-7", "Differential Equations", 6.0, 12.0),
            unit!(8, "unit-8", "Applications of Integration", 10.0, 15.0),
        ],
    },
    Subject {
        id: "ap-biology",
        name: "AP Biology",
        exam: ExamFormat { mcq_questions: 60, mcq_minutes: 90 },
        units: &[
            unit!(1, "unit-1", "Chemistry of Life", 8.0, 11.0),
            unit!(2, "unit-2", "Cell Structure and Function", 10.0, 13.0),
            unit!(3, "unit-3", "Cellular Energetics", 12.0, 16.0),
            unit!(4, "unit-4", "Cell Communication and Cell Cycle", 10.0, 15.0),
            unit!(5, "unit-5", "Heredity", 8.0, 11.0),
            unit!(6, "unit-6", "Gene Expression and Regulation", 12.0, 16.0),
            unit!(7, "unit-7", "Natural Selection", 13.0, 20.0),
            unit!(8, "unit-8", "Ecology", 10.0, 15.0),
        ],
    },
    Subject {
        id: "ap-chemistry",
        name: "AP Chemistry",
        exam: ExamFormat { mcq_questions: 60, mcq_minutes: 90 },
        units: &[
            unit!(1, "unit-1", "Atomic Structure and Properties", 7.0, 9.0),
            unit!(2, "unit-2", "Compound Structure and Properties", 7.0, 9.0),
            unit!(3, "unit-3", "Properties of Substances and Mixtures", 18.0, 22.0),
            unit!(4, "unit-4", "Chemical Reactions", 7.0, 9.0),
            unit!(5, "unit-5", "Kinetics", 7.0, 9.0),
            unit!(6, "unit-6", "Thermochemistry", 7.0, 9.0),
            unit!(7, "unit-7", "Equilibrium", 7.0, 9.0),
            unit!(8, "unit-8", "Acids and Bases", 11.0, 15.0),
            unit!(9, "unit-9", "Thermodynamics and Electrochemistry", 7.0, 9.0),
        ],
    },
    Subject {
        id: "ap-computer-science-a",
        name: "AP Computer Science A",
        exam: ExamFormat { mcq_questions: 40, mcq_minutes: 90 },
        units: &[
            unit!(1, "unit-1", "Primitive Types", 2.5, 5.0),
            unit!(2, "unit-2", "Using Objects", 5.0, 7.5),
            unit!(3, "unit-3", "Boolean Expressions and if Statements", 15.0, 17.5),
            unit!(4, "unit-4", "Iteration", 17.5, 22.5),
            unit!(5, "unit-5", "Writing Classes", 5.0, 7.5),
            unit!(6, "unit-6", "Array", 10.0, 15.0),
            unit!(7, "unit-7", "ArrayList", 2.5, 7.5),
            unit!(8, "unit-8", "2D Array", 7.5, 10.0),
            unit!(9, "unit-9", "Inheritance", 5.0, 10.0),
            unit!(10, "unit-10", "Recursion", 5.0, 7.5),
        ],
    },
    Subject {
        id: "ap-us-history",
        name: "AP United States History",
        exam: ExamFormat { mcq_questions: 55, mcq_minutes: 55 },
        units: &[
            unit!(1, "period-1", "Period 1: 1491-1607", 4.0, 6.0),
            unit!(2, "period-2", "Period 2: 1607-1754", 6.0, 8.0),
            unit!(3, "period-3", "Period 3: 1754-1800", 10.0, 17.0),
            unit!(4, "period-4", "Period 4: 1800-1848", 10.0, 17.0),
            unit!(5, "period-5", "Period 5: 1844-1877", 10.0, 17.0),
            unit!(6, "period-6", "Period 6: 1865-1898", 10.0, 17.0),
            unit!(7, "period-7", "Period 7: 1890-1945", 10.0, 17.0),
            unit!(8, "period-8", "Period 8: 1945-1980", 10.0, 17.0),
            unit!(9, "period-9", "Period 9: 1980-Present", 4.0, 6.0),
        ],
    },
];
