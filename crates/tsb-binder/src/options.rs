use tsb_common::limits;

/// Configuration for binding and resolution within a `Session`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinderOptions {
    /// Refuse `extends` edges that would close a cycle and report them.
    /// When off, cycles are linked as written; member lookup still
    /// terminates because heritage walks keep a visited set.
    pub detect_heritage_cycles: bool,
    /// Upper bound on `extends` levels followed by heritage walks.
    pub max_heritage_depth: u32,
    /// Upper bound on enclosing declarations searched for a name.
    pub max_scope_path_depth: u32,
    /// Syntax nesting the collector descends into.
    pub max_collect_depth: u32,
    /// Report a field and a method sharing a name in one container.
    pub report_member_collisions: bool,
}

impl Default for BinderOptions {
    fn default() -> Self {
        BinderOptions {
            detect_heritage_cycles: true,
            max_heritage_depth: limits::MAX_HERITAGE_DEPTH,
            max_scope_path_depth: limits::MAX_SCOPE_PATH_DEPTH,
            max_collect_depth: limits::MAX_COLLECT_DEPTH,
            report_member_collisions: true,
        }
    }
}
