use crate::monitoring::classroom::{self, ClassroomReport};
use crate::monitoring::compliance::{self, ComplianceReport};
use crate::monitoring::exam::{self, ExamReport};
use crate::monitoring::occupancy::{self, OccupancyReport};
use crate::monitoring::safety::{self, SafetyReport};
use crate::shared::detection::{Detection, FaceDetection};
use crate::shared::frame::Frame;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorModule {
    Classroom,
    Exam,
    Occupancy,
    Compliance,
    Safety,
}

impl MonitorModule {
    pub const ALL: &[MonitorModule] = &[
        MonitorModule::Classroom,
        MonitorModule::Exam,
        MonitorModule::Occupancy,
        MonitorModule::Compliance,
        MonitorModule::Safety,
    ];
}

impl std::fmt::Display for MonitorModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorModule::Classroom => write!(f, "classroom"),
            MonitorModule::Exam => write!(f, "exam"),
            MonitorModule::Occupancy => write!(f, "occupancy"),
            MonitorModule::Compliance => write!(f, "compliance"),
            MonitorModule::Safety => write!(f, "safety"),
        }
    }
}

impl std::str::FromStr for MonitorModule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classroom" => Ok(MonitorModule::Classroom),
            "exam" => Ok(MonitorModule::Exam),
            "occupancy" => Ok(MonitorModule::Occupancy),
            "compliance" => Ok(MonitorModule::Compliance),
            "safety" => Ok(MonitorModule::Safety),
            other => Err(format!("unknown monitoring module: {other}")),
        }
    }
}

/// One variant per module, produced fresh on every aggregation call.
/// Ownership passes to the caller; nothing here is retained or mutated.
#[derive(Clone, Debug, PartialEq)]
pub enum ModuleAnalysisResult {
    Classroom(ClassroomReport),
    Exam(ExamReport),
    Occupancy(OccupancyReport),
    Compliance(ComplianceReport),
    Safety(SafetyReport),
}

impl ModuleAnalysisResult {
    pub fn module(&self) -> MonitorModule {
        match self {
            ModuleAnalysisResult::Classroom(_) => MonitorModule::Classroom,
            ModuleAnalysisResult::Exam(_) => MonitorModule::Exam,
            ModuleAnalysisResult::Occupancy(_) => MonitorModule::Occupancy,
            ModuleAnalysisResult::Compliance(_) => MonitorModule::Compliance,
            ModuleAnalysisResult::Safety(_) => MonitorModule::Safety,
        }
    }

    /// Ordered, human-readable alerts regardless of variant.
    pub fn alerts(&self) -> &[String] {
        match self {
            ModuleAnalysisResult::Classroom(r) => &r.alerts,
            ModuleAnalysisResult::Exam(r) => &r.alerts,
            ModuleAnalysisResult::Occupancy(r) => &r.alerts,
            ModuleAnalysisResult::Compliance(r) => &r.alerts,
            ModuleAnalysisResult::Safety(r) => &r.alerts,
        }
    }
}

/// Dispatches to the active module's aggregator. Only the safety module
/// reads pixels, and only when a frame is supplied.
pub fn analyze(
    module: MonitorModule,
    objects: &[Detection],
    faces: &[FaceDetection],
    frame: Option<&Frame>,
) -> ModuleAnalysisResult {
    match module {
        MonitorModule::Classroom => {
            ModuleAnalysisResult::Classroom(classroom::analyze(objects, faces))
        }
        MonitorModule::Exam => ModuleAnalysisResult::Exam(exam::analyze(objects, faces)),
        MonitorModule::Occupancy => {
            ModuleAnalysisResult::Occupancy(occupancy::analyze(objects, faces))
        }
        MonitorModule::Compliance => {
            ModuleAnalysisResult::Compliance(compliance::analyze(objects, faces))
        }
        MonitorModule::Safety => {
            ModuleAnalysisResult::Safety(safety::analyze(objects, faces, frame))
        }
    }
}
