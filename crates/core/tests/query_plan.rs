mod common;

use common::ListingBuilder;
use stack_gauge_core::plan::QueryPlan;

#[test]
fn builtin_plan_parses() {
    let plan = QueryPlan::builtin().expect("builtin plan");
    assert_eq!(plan.queries, vec!["hashtest_sha256", "hashtest_sha512", "stack_8w", "stack_64w"]);
    assert_eq!(plan.call_hints.len(), 4);
    assert_eq!(plan.call_hints[1].caller(), Some("cf_sha256_update"));
    assert_eq!(plan.call_hints[1].chain().len(), 4);
}

#[test]
fn plan_without_hints_defaults_to_empty() {
    let plan = QueryPlan::from_json(r#"{"queries":["main"]}"#).expect("plan");
    assert!(plan.call_hints.is_empty());
    assert_eq!(plan.queries, vec!["main"]);
}

#[test]
fn malformed_plan_is_rejected() {
    let err = QueryPlan::from_json(r#"{"call_hints":[["a","b"]]}"#).unwrap_err();
    assert!(err.to_string().contains("failed to parse query plan JSON"));
}

#[test]
fn builtin_hints_follow_the_blockwise_chain() {
    // hashtest_sha256 -> cf_sha256_update -(ptr)-> cf_blockwise_accumulate
    //   -(ptr)-> cf_blockwise_accumulate_final -(ptr)-> sha256_update_block
    let program = ListingBuilder::new()
        .function(0x8000, "sha256_update_block")
        .sub_sp(200)
        .ret()
        .function(0x8100, "cf_blockwise_accumulate_final")
        .sub_sp(16)
        .blx("r5")
        .ret()
        .function(0x8200, "cf_blockwise_accumulate")
        .sub_sp(8)
        .bl(0x8100, "cf_blockwise_accumulate_final")
        .ret()
        .function(0x8300, "cf_sha256_update")
        .sub_sp(8)
        .insn("4718", "bx\tr3")
        .function(0x8400, "hashtest_sha256")
        .sub_sp(120)
        .bl(0x8300, "cf_sha256_update")
        .ret()
        .program();

    let plan = QueryPlan::builtin().unwrap();
    let program = plan.apply_hints(program);
    assert_eq!(program.call_hints().len(), 4);

    // The static edge accumulate -> final and the hinted one coincide.
    assert_eq!(program.measure("hashtest_sha256").unwrap().bytes, 120 + 8 + 8 + 16 + 200);
    assert_eq!(program.measure("hashtest_sha512").unwrap().bytes, 0);
}
