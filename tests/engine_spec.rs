use devnotes::engine::Diagram;
use devnotes::layout::{FILE_MIN_EXP, FILE_PAD_B, FN_SLOT, FN_START_Y};
use devnotes::models::*;
use speculate2::speculate;

speculate! {
    before {
        let mut diagram = Diagram::new();
    }

    describe "the documented editing scenario" {
        it "builds, deletes, and fully restores a component subtree" {
            diagram.create(NodeKind::Project, None).unwrap();
            let comp = diagram.create(NodeKind::Component, None).unwrap();
            let file = diagram.create(NodeKind::File, Some(&comp)).unwrap();

            // An empty file sits at the expanded minimum.
            assert_eq!(diagram.store().node(&file).unwrap().height(), Some(FILE_MIN_EXP));

            for _ in 0..3 {
                diagram.create(NodeKind::Function, Some(&file)).unwrap();
            }
            let file_h = FN_START_Y + 3.0 * FN_SLOT + FILE_PAD_B;
            assert_eq!(diagram.store().node(&file).unwrap().height(), Some(file_h));
            // The component grew to contain it.
            assert!(diagram.store().node(&comp).unwrap().height().unwrap() > file_h);

            diagram.flush_history();
            let before: Vec<Node> = diagram.nodes().to_vec();

            let removed = diagram.delete(&[comp.clone()]);
            assert_eq!(removed.len(), 5); // component + file + 3 functions
            assert!(diagram.store().node(&file).is_none());
            diagram.flush_history();

            assert!(diagram.undo());
            let restored: Vec<Node> = diagram.nodes().to_vec();
            assert_eq!(restored, before);
        }
    }

    describe "intents" {
        it "connect creates a typed edge and delete cascades over it" {
            let project = diagram.create(NodeKind::Project, None).unwrap();
            let comp = diagram.create(NodeKind::Component, None).unwrap();
            let edge = diagram.connect(&project, &comp, EdgeKind::Dependency).unwrap();
            assert_eq!(diagram.store().edge(&edge).unwrap().label(), "depends on");

            diagram.delete(&[comp]);
            assert!(diagram.edges().is_empty());
        }

        it "set_attribute re-derives layout when collapse changes" {
            let comp = diagram.create(NodeKind::Component, None).unwrap();
            let file = diagram.create(NodeKind::File, Some(&comp)).unwrap();
            diagram.create(NodeKind::Function, Some(&file)).unwrap();

            diagram.set_attribute(&file, NodePatch {
                collapsed: Some(true),
                ..NodePatch::default()
            });
            assert_eq!(
                diagram.store().node(&file).unwrap().height(),
                Some(devnotes::layout::FILE_COLLAPSED_H)
            );
        }

        it "resize re-packs the component's files" {
            let comp = diagram.create(NodeKind::Component, None).unwrap();
            let a = diagram.create(NodeKind::File, Some(&comp)).unwrap();
            let b = diagram.create(NodeKind::File, Some(&comp)).unwrap();

            let wide = devnotes::layout::COMP_PAD_H * 2.0
                + devnotes::layout::FILE_W * 2.0
                + devnotes::layout::FILE_GAP_H;
            diagram.resize(&comp, wide);

            let pa = diagram.store().node(&a).unwrap().position;
            let pb = diagram.store().node(&b).unwrap().position;
            assert_eq!(pa.y, pb.y);
            assert_ne!(pa.x, pb.x);
        }

        it "duplicate clones a whole component" {
            let comp = diagram.create(NodeKind::Component, None).unwrap();
            let file = diagram.create(NodeKind::File, Some(&comp)).unwrap();
            diagram.create(NodeKind::Function, Some(&file)).unwrap();

            let copy = diagram.duplicate(&comp).unwrap();
            let copied_files = diagram.store().children_of_kind(&copy, NodeKind::File);
            assert_eq!(copied_files.len(), 1);
            assert!(diagram.store().node(&copy).unwrap().data.label.ends_with("(copy)"));
        }

        it "collapse_all folds every file" {
            let comp = diagram.create(NodeKind::Component, None).unwrap();
            let a = diagram.create(NodeKind::File, Some(&comp)).unwrap();
            let b = diagram.create(NodeKind::File, Some(&comp)).unwrap();

            diagram.collapse_all(true);
            assert!(diagram.store().node(&a).unwrap().data.collapsed);
            assert!(diagram.store().node(&b).unwrap().data.collapsed);
        }

        it "selection does not create history" {
            let comp = diagram.create(NodeKind::Component, None).unwrap();
            diagram.flush_history();
            let could_undo = diagram.can_undo();

            diagram.select(&comp, true);
            diagram.flush_history();
            diagram.clear_selection();
            diagram.flush_history();

            assert_eq!(diagram.can_undo(), could_undo);
        }
    }

    describe "undo and redo through the facade" {
        it "tracks can_undo and can_redo across the cycle" {
            assert!(!diagram.can_undo());
            diagram.create(NodeKind::Component, None).unwrap();
            diagram.flush_history();
            assert!(diagram.can_undo());
            assert!(!diagram.can_redo());

            assert!(diagram.undo());
            assert!(diagram.nodes().is_empty());
            assert!(diagram.can_redo());

            assert!(diagram.redo());
            assert_eq!(diagram.nodes().len(), 1);
            assert!(!diagram.can_redo());
        }

        it "a new edit after undo drops the redo branch" {
            diagram.create(NodeKind::Component, None).unwrap();
            diagram.flush_history();
            diagram.undo();

            diagram.create(NodeKind::Project, None).unwrap();
            diagram.flush_history();
            assert!(!diagram.can_redo());
        }
    }

    describe "import and export" {
        it "round-trips through the facade" {
            let original = Diagram::sample();
            let json = original.export_json().unwrap();

            let report = diagram.import_json(&json).unwrap();
            assert_eq!(report.nodes, original.nodes().len());
            assert_eq!(diagram.stats().functions, 2);
        }

        it "import is one undoable edit" {
            diagram.create(NodeKind::Component, None).unwrap();
            diagram.flush_history();
            let before: Vec<Node> = diagram.nodes().to_vec();

            let json = Diagram::sample().export_json().unwrap();
            diagram.import_json(&json).unwrap();
            diagram.flush_history();
            assert_ne!(diagram.nodes().len(), before.len());

            assert!(diagram.undo());
            assert_eq!(diagram.nodes(), before.as_slice());
        }

        it "a failed import changes nothing" {
            diagram.create(NodeKind::Component, None).unwrap();
            let before: Vec<Node> = diagram.nodes().to_vec();
            assert!(diagram.import_json(r#"{"nodes": 5}"#).is_err());
            assert_eq!(diagram.nodes(), before.as_slice());
        }
    }

    describe "the sample diagram" {
        it "ships one project, one component, one file, two functions" {
            let sample = Diagram::sample();
            let stats = sample.stats();
            assert_eq!(stats.projects, 1);
            assert_eq!(stats.components, 1);
            assert_eq!(stats.files, 1);
            assert_eq!(stats.functions, 2);
            assert_eq!(stats.edges, 1);
        }
    }
}
