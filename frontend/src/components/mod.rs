pub mod analysis;
pub mod overview_card;

pub use analysis::AnalysisPage;
pub use overview_card::OverviewCard;
