// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Node type metadata registration
//!
//! Registers every built-in node type with inventory. Each node type's
//! attribute schema is derived from its attribute struct using schemars,
//! so the struct the visitors deserialize IS the schema.

use crate::node_meta::NodeTypeMeta;
use crate::{
    BuiltinNodeType, EndAttributes, EventSubProcessAttributes, ForEachAttributes,
    JoinAttributes, MilestoneAttributes, SplitAttributes, StartAttributes, SubProcessAttributes,
    TaskAttributes, TimerAttributes, WorkItemAttributes,
};

// ============================================================================
// Schema Generator Functions
// ============================================================================

fn schema_start() -> schemars::schema::RootSchema {
    schemars::schema_for!(StartAttributes)
}

fn schema_end() -> schemars::schema::RootSchema {
    schemars::schema_for!(EndAttributes)
}

fn schema_task() -> schemars::schema::RootSchema {
    schemars::schema_for!(TaskAttributes)
}

fn schema_work_item() -> schemars::schema::RootSchema {
    schemars::schema_for!(WorkItemAttributes)
}

fn schema_split() -> schemars::schema::RootSchema {
    schemars::schema_for!(SplitAttributes)
}

fn schema_join() -> schemars::schema::RootSchema {
    schemars::schema_for!(JoinAttributes)
}

fn schema_timer() -> schemars::schema::RootSchema {
    schemars::schema_for!(TimerAttributes)
}

fn schema_milestone() -> schemars::schema::RootSchema {
    schemars::schema_for!(MilestoneAttributes)
}

fn schema_sub_process() -> schemars::schema::RootSchema {
    schemars::schema_for!(SubProcessAttributes)
}

fn schema_for_each() -> schemars::schema::RootSchema {
    schemars::schema_for!(ForEachAttributes)
}

fn schema_event_sub_process() -> schemars::schema::RootSchema {
    schemars::schema_for!(EventSubProcessAttributes)
}

// ============================================================================
// Node Type Metadata Registrations
// ============================================================================

static START_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::Start.tag(),
    display_name: "Start",
    description: "Entry point of a graph",
    category: "event",
    composite: false,
    schema_fn: schema_start,
};

static END_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::End.tag(),
    display_name: "End",
    description: "Exit point of a graph",
    category: "event",
    composite: false,
    schema_fn: schema_end,
};

static TASK_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::Task.tag(),
    display_name: "Script Task",
    description: "Evaluates an expression, optionally storing the result",
    category: "execution",
    composite: false,
    schema_fn: schema_task,
};

static WORK_ITEM_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::WorkItem.tag(),
    display_name: "Work Item",
    description: "Delegates work to a named work item handler",
    category: "execution",
    composite: false,
    schema_fn: schema_work_item,
};

static SPLIT_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::Split.tag(),
    display_name: "Split Gateway",
    description: "Diverges control flow into constrained branches",
    category: "control",
    composite: false,
    schema_fn: schema_split,
};

static JOIN_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::Join.tag(),
    display_name: "Join Gateway",
    description: "Synchronizes converging branches",
    category: "control",
    composite: false,
    schema_fn: schema_join,
};

static TIMER_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::Timer.tag(),
    display_name: "Timer",
    description: "Waits for a delay before continuing",
    category: "event",
    composite: false,
    schema_fn: schema_timer,
};

static MILESTONE_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::Milestone.tag(),
    display_name: "Milestone",
    description: "Completes once its condition holds",
    category: "control",
    composite: false,
    schema_fn: schema_milestone,
};

static SUB_PROCESS_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::Sub.tag(),
    display_name: "Embedded Sub-Process",
    description: "Runs an embedded sub-graph with its own variables",
    category: "container",
    composite: true,
    schema_fn: schema_sub_process,
};

static FOR_EACH_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::ForEach.tag(),
    display_name: "For Each",
    description: "Runs an embedded sub-graph once per collection item",
    category: "container",
    composite: true,
    schema_fn: schema_for_each,
};

static EVENT_SUB_PROCESS_META: NodeTypeMeta = NodeTypeMeta {
    id: BuiltinNodeType::EventSub.tag(),
    display_name: "Event Sub-Process",
    description: "Runs an embedded sub-graph when a signal arrives",
    category: "container",
    composite: true,
    schema_fn: schema_event_sub_process,
};

// Register all built-in node types with inventory
inventory::submit! { &START_META }
inventory::submit! { &END_META }
inventory::submit! { &TASK_META }
inventory::submit! { &WORK_ITEM_META }
inventory::submit! { &SPLIT_META }
inventory::submit! { &JOIN_META }
inventory::submit! { &TIMER_META }
inventory::submit! { &MILESTONE_META }
inventory::submit! { &SUB_PROCESS_META }
inventory::submit! { &FOR_EACH_META }
inventory::submit! { &EVENT_SUB_PROCESS_META }
