use clap::Args;
use sales_pipeline_sdk::{FunnelDraft, LeadDraft, StageDraft};
use time::Date;
use time::macros::format_description;

#[derive(Args)]
pub struct FunnelArgs {
    /// Existing funnel id; omit to create
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Hex color, e.g. "#3b82f6"
    #[arg(long)]
    color: Option<String>,
}

impl From<FunnelArgs> for FunnelDraft {
    fn from(a: FunnelArgs) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            color: a.color,
        }
    }
}

#[derive(Args)]
pub struct StageArgs {
    /// Existing stage id; omit to create
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    funnel_id: String,
    #[arg(long)]
    name: String,
    /// Position in the funnel (ascending)
    #[arg(long)]
    position: Option<i32>,
    #[arg(long)]
    color: Option<String>,
}

impl From<StageArgs> for StageDraft {
    fn from(a: StageArgs) -> Self {
        Self {
            id: a.id,
            funnel_id: a.funnel_id,
            name: a.name,
            position: a.position,
            color: a.color,
        }
    }
}

#[derive(Args)]
pub struct LeadArgs {
    /// Existing lead id; omit to create
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value_t = 0.0)]
    value: f64,
    #[arg(long)]
    stage_id: String,
    #[arg(long)]
    funnel_id: String,
    /// Due date, YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    due_on: Option<Date>,
    #[arg(long, default_value = "")]
    tag: String,
    #[arg(long, default_value = "")]
    tag_color: String,
    #[arg(long)]
    partner_id: Option<String>,
}

impl From<LeadArgs> for LeadDraft {
    fn from(a: LeadArgs) -> Self {
        Self {
            id: a.id,
            name: a.name,
            description: a.description,
            value: a.value,
            stage_id: a.stage_id,
            funnel_id: a.funnel_id,
            due_on: a.due_on,
            tag: a.tag,
            tag_color: a.tag_color,
            partner_id: a.partner_id,
        }
    }
}

fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
