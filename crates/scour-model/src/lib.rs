pub mod error;
pub mod options;
pub mod plan;
pub mod profile;
pub mod report;

pub use error::{ModelError, Result};
pub use options::{ProfileOptions, RunOptions};
pub use plan::{
    CategoricalStrategy, CleaningPlan, DatetimeStrategy, FillValue, NumericStrategy,
    OutlierAction, OutlierMethod, PLAN_VERSION, PlanParams, PlanSource, StepName,
};
pub use profile::{
    BooleanCandidate, CardinalityEntry, ColumnFraction, ColumnGroups, ColumnStat,
    CorrelationPair, CorrelationSignals, DatasetType, DatetimeCandidate, DuplicateStats,
    GroupCounts, Missingness, OutlierSignal, OutlierSignals, SkewnessSignals, StringQuality,
    TableProfile,
};
pub use report::{
    CastTypesReport, ClipBounds, DatetimeInferenceReport, DeduplicateReport, DropRulesReport,
    DtypeChange, EncodeBooleansReport, ImputeReport, MissingChange, NormalizeReport,
    OutliersReport, RunReport, StandardizeMissingReport, StepReports, TrimStringsReport,
};
