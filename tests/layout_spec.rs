use devnotes::layout::{self, COMP_HEADER_H, COMP_MIN_W, COMP_PAD_H, FILE_GAP_H, FILE_GAP_V, FILE_MIN_EXP, FILE_W, FN_SLOT, FN_START_Y, FN_X};
use devnotes::models::*;
use devnotes::store::GraphStore;
use speculate2::speculate;

fn add(store: &mut GraphStore, kind: NodeKind, parent: Option<&str>, label: &str) -> String {
    store
        .add_node(kind, parent, Some(NodeData::with_label(label)))
        .expect("Failed to create node")
        .id
        .clone()
}

fn two_column_width() -> f64 {
    COMP_PAD_H * 2.0 + FILE_W * 2.0 + FILE_GAP_H
}

speculate! {
    before {
        let mut store = GraphStore::new();
        let comp = add(&mut store, NodeKind::Component, None, "C");
    }

    describe "derived file heights" {
        it "an empty file sits at the expanded minimum" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            layout::layout_component(&mut store, &comp);
            assert_eq!(store.node(&file).unwrap().height(), Some(FILE_MIN_EXP));
        }

        it "grows with the function count" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            for i in 0..3 {
                add(&mut store, NodeKind::Function, Some(&file), &format!("f{i}()"));
            }
            layout::layout_component(&mut store, &comp);
            assert_eq!(
                store.node(&file).unwrap().height(),
                Some(FN_START_Y + 3.0 * FN_SLOT + layout::FILE_PAD_B)
            );
        }

        it "collapsed files drop to the fixed collapsed height" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            add(&mut store, NodeKind::Function, Some(&file), "f()");
            store.set_collapsed(&file, true);
            layout::layout_component(&mut store, &comp);
            assert_eq!(store.node(&file).unwrap().height(), Some(layout::FILE_COLLAPSED_H));
        }
    }

    describe "function stacking" {
        it "functions land on their slot formula positions" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            let f0 = add(&mut store, NodeKind::Function, Some(&file), "a()");
            let f1 = add(&mut store, NodeKind::Function, Some(&file), "b()");
            layout::layout_component(&mut store, &comp);
            assert_eq!(store.node(&f0).unwrap().position, Position::new(FN_X, FN_START_Y));
            assert_eq!(
                store.node(&f1).unwrap().position,
                Position::new(FN_X, FN_START_Y + FN_SLOT)
            );
        }

        it "collapse clusters functions at the header offset, expand restores them" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            let f0 = add(&mut store, NodeKind::Function, Some(&file), "a()");
            let f1 = add(&mut store, NodeKind::Function, Some(&file), "b()");

            store.set_collapsed(&file, true);
            layout::layout_component(&mut store, &comp);
            assert_eq!(store.node(&f0).unwrap().position, store.node(&f1).unwrap().position);

            store.set_collapsed(&file, false);
            layout::layout_component(&mut store, &comp);
            assert_eq!(
                store.node(&f1).unwrap().position,
                Position::new(FN_X, FN_START_Y + FN_SLOT)
            );
        }
    }

    describe "column packing in the store" {
        it "a single column stacks files downward" {
            let a = add(&mut store, NodeKind::File, Some(&comp), "a.ts");
            let b = add(&mut store, NodeKind::File, Some(&comp), "b.ts");
            store.resize_component(&comp, COMP_MIN_W);
            layout::layout_component(&mut store, &comp);

            let pa = store.node(&a).unwrap().position;
            let pb = store.node(&b).unwrap().position;
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.y, COMP_HEADER_H + FILE_GAP_V);
            assert_eq!(pb.y, pa.y + FILE_MIN_EXP + FILE_GAP_V);
        }

        it "a wider component packs into two columns" {
            let a = add(&mut store, NodeKind::File, Some(&comp), "a.ts");
            let b = add(&mut store, NodeKind::File, Some(&comp), "b.ts");
            store.resize_component(&comp, two_column_width());
            layout::layout_component(&mut store, &comp);

            let pa = store.node(&a).unwrap().position;
            let pb = store.node(&b).unwrap().position;
            assert_eq!(pa.x, COMP_PAD_H);
            assert_eq!(pb.x, COMP_PAD_H + FILE_W + FILE_GAP_H);
            assert_eq!(pa.y, pb.y);
        }

        it "no two files under one component share a packed slot" {
            for i in 0..6 {
                add(&mut store, NodeKind::File, Some(&comp), &format!("f{i}.ts"));
            }
            store.resize_component(&comp, two_column_width());
            layout::layout_component(&mut store, &comp);

            let mut slots: Vec<(i64, i64)> = store
                .children_of_kind(&comp, NodeKind::File)
                .iter()
                .map(|f| (f.position.x as i64, f.position.y as i64))
                .collect();
            slots.sort();
            slots.dedup();
            assert_eq!(slots.len(), 6);
        }
    }

    describe "component sizing" {
        it "grows to contain its tallest column" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            for i in 0..3 {
                add(&mut store, NodeKind::Function, Some(&file), &format!("f{i}()"));
            }
            layout::layout_component(&mut store, &comp);

            let file_h = store.node(&file).unwrap().height().unwrap();
            let expected = COMP_HEADER_H + FILE_GAP_V + file_h + FILE_GAP_V + layout::COMP_PAD_V;
            assert_eq!(store.node(&comp).unwrap().height(), Some(expected));
        }

        it "an empty component keeps its minimum height" {
            layout::layout_component(&mut store, &comp);
            assert_eq!(store.node(&comp).unwrap().height(), Some(layout::COMP_MIN_H));
        }

        it "out-of-range stored widths are pulled back into range" {
            if let Some(node) = store.node(&comp) {
                assert!(node.width().is_some());
            }
            // Simulate a hand-edited width below the minimum.
            store.resize_component(&comp, 50.0);
            layout::layout_component(&mut store, &comp);
            assert_eq!(store.node(&comp).unwrap().width(), Some(COMP_MIN_W));
        }
    }

    describe "recomputation triggers" {
        it "layout_subtree from a function reaches the owning component" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            let func = add(&mut store, NodeKind::Function, Some(&file), "f()");
            layout::layout_subtree(&mut store, &func);
            assert!(store.node(&comp).unwrap().height().is_some());
            assert_eq!(store.node(&func).unwrap().position, Position::new(FN_X, FN_START_Y));
        }

        it "the full pass is idempotent" {
            let file = add(&mut store, NodeKind::File, Some(&comp), "F");
            add(&mut store, NodeKind::Function, Some(&file), "f()");
            let other = add(&mut store, NodeKind::Component, None, "Other");
            add(&mut store, NodeKind::File, Some(&other), "o.ts");

            layout::layout_all(&mut store);
            let first: Vec<Node> = store.nodes().to_vec();
            layout::layout_all(&mut store);
            assert_eq!(store.nodes(), first.as_slice());
        }

        it "a width resize re-packs from scratch" {
            let a = add(&mut store, NodeKind::File, Some(&comp), "a.ts");
            let b = add(&mut store, NodeKind::File, Some(&comp), "b.ts");
            store.resize_component(&comp, COMP_MIN_W);
            layout::layout_component(&mut store, &comp);
            let single_col_b = store.node(&b).unwrap().position;

            store.resize_component(&comp, two_column_width());
            layout::layout_component(&mut store, &comp);
            let two_col_b = store.node(&b).unwrap().position;

            assert_ne!(single_col_b, two_col_b);
            assert_eq!(store.node(&a).unwrap().position.y, two_col_b.y);
        }
    }
}
