//! Reconstruct list containers from runs of adjacent list-item siblings.
//!
//! The content source has no list blocks, only consecutive items. Grouping
//! rebuilds the tree with a synthetic `List` container around every maximal
//! run of same-kind items, at every nesting level.

use crate::identity::IdGenerator;
use blockwiki_types::{Block, BlockKind, ListKind};

/// Apply both grouping passes: numbered items first, then bulleted items.
pub fn group_all(blocks: Vec<Block>, ids: &IdGenerator) -> Vec<Block> {
    let blocks = group_lists(blocks, ListKind::Numbered, ids);
    group_lists(blocks, ListKind::Bulleted, ids)
}

/// Collapse runs of `list` items into containers, children first.
///
/// Identifiers are drawn depth-first in document order: a block's children are
/// grouped before the run it belongs to is closed.
pub fn group_lists(blocks: Vec<Block>, list: ListKind, ids: &IdGenerator) -> Vec<Block> {
    let mut result = Vec::with_capacity(blocks.len());
    let mut run: Vec<Block> = Vec::new();

    for mut block in blocks {
        if !block.children.is_empty() {
            let children = std::mem::take(&mut block.children);
            block.children = group_lists(children, list, ids);
        }

        if block.is_list_item(list) {
            run.push(block);
        } else {
            flush(&mut run, &mut result, list, ids);
            result.push(block);
        }
    }
    flush(&mut run, &mut result, list, ids);

    result
}

fn flush(run: &mut Vec<Block>, out: &mut Vec<Block>, list: ListKind, ids: &IdGenerator) {
    if run.is_empty() {
        return;
    }
    let container =
        Block::new(ids.next_id(), BlockKind::List { list }).with_children(std::mem::take(run));
    out.push(container);
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwiki_types::RichText;

    fn item(id: &str, list: ListKind) -> Block {
        Block::new(
            id,
            BlockKind::ListItem {
                list,
                text: vec![RichText::plain(id)],
            },
        )
    }

    fn para(id: &str) -> Block {
        Block::new(
            id,
            BlockKind::Paragraph {
                text: vec![RichText::plain(id)],
            },
        )
    }

    fn child_ids(block: &Block) -> Vec<&str> {
        block.children.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn run_between_paragraphs_becomes_one_container() {
        let ids = IdGenerator::new("seed");
        let blocks = vec![
            para("p1"),
            item("a", ListKind::Bulleted),
            item("b", ListKind::Bulleted),
            item("c", ListKind::Bulleted),
            para("p2"),
        ];

        let grouped = group_lists(blocks, ListKind::Bulleted, &ids);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].id.as_str(), "p1");
        assert_eq!(
            grouped[1].kind,
            BlockKind::List {
                list: ListKind::Bulleted
            }
        );
        assert_eq!(child_ids(&grouped[1]), vec!["a", "b", "c"]);
        assert_eq!(grouped[2].id.as_str(), "p2");
    }

    #[test]
    fn interruption_splits_runs() {
        let ids = IdGenerator::new("seed");
        let blocks = vec![
            item("a", ListKind::Bulleted),
            para("p"),
            item("b", ListKind::Bulleted),
        ];

        let grouped = group_lists(blocks, ListKind::Bulleted, &ids);
        assert_eq!(grouped.len(), 3);
        assert_eq!(child_ids(&grouped[0]), vec!["a"]);
        assert_eq!(child_ids(&grouped[2]), vec!["b"]);
        assert_ne!(grouped[0].id, grouped[2].id);
    }

    #[test]
    fn other_kind_passes_through() {
        let ids = IdGenerator::new("seed");
        let blocks = vec![item("n", ListKind::Numbered), item("b", ListKind::Bulleted)];

        let grouped = group_lists(blocks, ListKind::Bulleted, &ids);
        assert_eq!(grouped[0].id.as_str(), "n");
        assert_eq!(child_ids(&grouped[1]), vec!["b"]);
    }

    #[test]
    fn adjacent_different_kinds_form_separate_containers() {
        let ids = IdGenerator::new("seed");
        let blocks = vec![
            item("n1", ListKind::Numbered),
            item("n2", ListKind::Numbered),
            item("b1", ListKind::Bulleted),
        ];

        let grouped = group_all(blocks, &ids);
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped[0].kind,
            BlockKind::List {
                list: ListKind::Numbered
            }
        );
        assert_eq!(child_ids(&grouped[0]), vec!["n1", "n2"]);
        assert_eq!(child_ids(&grouped[1]), vec!["b1"]);
    }

    #[test]
    fn nested_items_are_grouped_inside_their_parent() {
        let ids = IdGenerator::new("seed");
        let parent = item("a", ListKind::Bulleted).with_children(vec![
            item("a1", ListKind::Bulleted),
            item("a2", ListKind::Bulleted),
        ]);

        let grouped = group_lists(vec![parent], ListKind::Bulleted, &ids);
        assert_eq!(grouped.len(), 1);
        let outer_item = &grouped[0].children[0];
        assert_eq!(outer_item.id.as_str(), "a");
        assert_eq!(outer_item.children.len(), 1);
        assert_eq!(child_ids(&outer_item.children[0]), vec!["a1", "a2"]);
    }

    #[test]
    fn grouping_is_reproducible() {
        let tree = || {
            vec![
                item("a", ListKind::Bulleted)
                    .with_children(vec![item("a1", ListKind::Numbered)]),
                para("p"),
                item("b", ListKind::Bulleted),
            ]
        };

        let first = group_all(tree(), &IdGenerator::new("seed"));
        let second = group_all(tree(), &IdGenerator::new("seed"));
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let ids = IdGenerator::new("seed");
        assert!(group_all(Vec::new(), &ids).is_empty());
    }
}
