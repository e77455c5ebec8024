#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableState {
    Info,
    Warn,
    Fail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableViolation {
    pub state: RenderableState,
    pub policy: String,
    pub component: String,
    pub subject: String,
    pub operator: String,
    pub value: String,
    pub violation_type: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableData {
    pub components_evaluated: u32,
    pub policies_defined: u32,
    pub violations_total: u32,
    pub violations_added: u32,
    pub violations_removed: u32,
    pub dispatch_timeouts: u32,
    pub evaluator_failures: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub verdict: RenderableVerdict,
    pub violations: Vec<RenderableViolation>,
    pub data: RenderableData,
}
