use super::*;

/// Mimics the shape of a left-nested `a + (b + (c + ...))` lowering.
fn render_chain(depth: u32) -> usize {
    ensure_sufficient_stack(|| {
        if depth == 0 {
            1
        } else {
            render_chain(depth - 1) + 4
        }
    })
}

#[test]
fn shallow_chain_renders() {
    assert_eq!(render_chain(3), 13);
}

#[test]
fn deep_chain_does_not_overflow() {
    // Far beyond what an 8MB main-thread stack survives without growth.
    assert_eq!(render_chain(200_000), 800_001);
}

#[test]
fn propagates_results() {
    let lowered: Result<&str, String> = ensure_sufficient_stack(|| Ok("_vela.ZERO"));
    assert_eq!(lowered, Ok("_vela.ZERO"));
}
