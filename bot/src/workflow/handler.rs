use crate::command::{parse_tokens, resolve_target};
use crate::workflow::context::QueryContext;
use growthcore::prelude::PipelineError;
use growthcore::records::GrowthReport;
use log::{info, warn};

pub const UNKNOWN_LOCATION_REPLY: &str = "I don't recognize that =(";
pub const UNAVAILABLE_REPLY: &str = "Couldn't get the Corona data =(";
pub const FAILURE_REPLY: &str = "Something went wrong =(";

/// Text answer for the chat, plus the growth report when a plot was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub growth: Option<GrowthReport>,
}

impl Reply {
    fn text_only(text: &str) -> Self {
        Self {
            text: text.to_string(),
            growth: None,
        }
    }
}

/// Answers one chat query. Failures become reply text; nothing here can take
/// the process down.
pub async fn handle_query<S: AsRef<str>>(context: &QueryContext, tokens: &[S]) -> Reply {
    let query = parse_tokens(tokens);
    let Some(location) = resolve_target(&query.target) else {
        info!("unrecognized location in {:?}", query.target);
        context.metrics.record_failure();
        return Reply::text_only(UNKNOWN_LOCATION_REPLY);
    };

    let records = match context.source.fetch(&location).await {
        Ok(records) => records,
        Err(err) => {
            warn!("fetching records for {}: {:#}", location.code(), err);
            context.metrics.record_failure();
            return Reply::text_only(UNAVAILABLE_REPLY);
        }
    };

    let report = match context.pipeline.run(&location.label(), &records) {
        Ok(report) => report,
        Err(PipelineError::NoData) => {
            warn!("no records for {}", location.code());
            context.metrics.record_failure();
            return Reply::text_only(UNAVAILABLE_REPLY);
        }
        Err(err) => {
            warn!("pipeline failed for {}: {}", location.code(), err);
            context.metrics.record_failure();
            return Reply::text_only(FAILURE_REPLY);
        }
    };

    context.metrics.record_served(report.skipped_records);
    let text = format!(
        "There are {} positive cases in {} =(",
        report.current_positive,
        location.reply_name()
    );

    Reply {
        text,
        growth: query.plot.then_some(report),
    }
}
