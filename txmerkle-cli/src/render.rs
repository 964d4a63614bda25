//! Console presentation of a [`Reduction`]. Nothing here feeds back into
//! hashing; it only reads the trace.

use std::fmt::Write;
use txmerkle_core::merkle::Reduction;
use txmerkle_core::Digest;

pub const RULE_WIDTH: usize = 80;
const SHORT_HEX: usize = 16;

pub fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

fn short(d: &Digest) -> String {
    let h = d.to_display_hex();
    format!("{}...", &h[..SHORT_HEX])
}

/// Pair-by-pair walkthrough, one block per reduction level.
pub fn render_steps(r: &Reduction) -> String {
    let mut out = String::new();
    for level in 0..r.depth() {
        let _ = writeln!(out, "Level {}:", level);
        let _ = writeln!(out, "{}", rule('-'));
        for s in r.steps_at(level) {
            let _ = writeln!(out, "  Pair {}:{}", s.pair + 1, if s.duplicated { " (duplicated)" } else { "" });
            let _ = writeln!(out, "    Left:   {}", s.left);
            let _ = writeln!(out, "    Right:  {}", s.right);
            let _ = writeln!(out, "    Parent: {}", s.parent);
            out.push('\n');
        }
    }
    out
}

/// Indented ASCII tree from the root down to the leaves. A child that exists
/// only because its level was odd is marked `(dup)` and not expanded again.
pub fn render_tree(r: &Reduction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "MERKLE ROOT {}", r.root_hex());
    let _ = writeln!(out, "{}", label(r, r.depth(), 0));
    render_children(r, r.depth(), 0, "", &mut out);
    out
}

fn label(r: &Reduction, level: usize, idx: usize) -> String {
    let node = short(&r.levels[level].nodes[idx]);
    if level == 0 {
        format!("{}  tx{}", node, idx + 1)
    } else {
        node
    }
}

fn render_children(r: &Reduction, level: usize, idx: usize, prefix: &str, out: &mut String) {
    if level == 0 {
        return;
    }
    let below = level - 1;
    let width = r.levels[below].nodes.len();
    let left = 2 * idx;
    let (right, dup) = if left + 1 < width { (left + 1, false) } else { (left, true) };
    for (last, child, is_dup) in [(false, left, false), (true, right, dup)] {
        let branch = if last { "`-- " } else { "+-- " };
        let tag = if is_dup { " (dup)" } else { "" };
        let _ = writeln!(out, "{}{}{}{}", prefix, branch, label(r, below, child), tag);
        if !is_dup {
            let ext = if last { "    " } else { "|   " };
            render_children(r, below, child, &format!("{}{}", prefix, ext), out);
        }
    }
}
