pub mod live_chart;
pub mod stats_view;
