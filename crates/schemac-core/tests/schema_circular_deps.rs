use schemac_core::Schema;

fn tables(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("Table {name} {{\n  id UUID [primary key]\n  other_id UUID\n}}\n"))
        .collect()
}

fn schema(names: &[&str], fks: &[&str]) -> Schema {
    let mut src = tables(names);
    for fk in fks {
        src.push_str(fk);
        src.push('\n');
    }
    Schema::parse(&src).unwrap()
}

#[test]
fn no_cycles() {
    let schema = schema(
        &["Groups", "Users"],
        &["FK Users.other_id -> Groups.id"],
    );

    assert!(schema.circular_deps.is_empty());
    assert!(!schema.is_deferred(&schema.forward_fks("Users")[0]));
}

#[test]
fn self_reference_is_deferred() {
    let schema = schema(
        &["Tasks"],
        &["FK Tasks.other_id as parent -> Tasks.id as children"],
    );

    assert!(schema.circular_deps.contains("Tasks", "Tasks"));
    assert!(schema.is_deferred(&schema.forward_fks("Tasks")[0]));
}

#[test]
fn three_table_ring() {
    let schema = schema(
        &["A", "B", "C"],
        &[
            "FK A.other_id -> B.id",
            "FK B.other_id -> C.id",
            "FK C.other_id -> A.id",
        ],
    );

    for from in ["A", "B", "C"] {
        for to in ["A", "B", "C"] {
            assert!(
                schema.circular_deps.contains(from, to),
                "missing ({from}, {to})"
            );
        }
    }

    for table in ["A", "B", "C"] {
        assert!(schema.is_deferred(&schema.forward_fks(table)[0]));
    }
}

#[test]
fn two_separate_cycles_stay_separate() {
    let schema = schema(
        &["A", "B", "C", "D"],
        &[
            "FK A.other_id -> B.id",
            "FK B.other_id -> A.id",
            "FK C.other_id -> D.id",
            "FK D.other_id -> C.id",
        ],
    );

    assert!(schema.circular_deps.involves("A", "B"));
    assert!(schema.circular_deps.involves("C", "D"));
    assert!(!schema.circular_deps.involves("A", "C"));
    assert!(!schema.circular_deps.involves("B", "D"));
}

#[test]
fn cycle_through_undeclared_table() {
    let schema = schema(
        &["A"],
        &["FK A.other_id -> Ghost.id", "FK Ghost.other_id -> A.id"],
    );

    assert!(schema.circular_deps.involves("A", "Ghost"));
}

#[test]
fn adding_an_edge_never_removes_a_pair() {
    let names = ["A", "B", "C", "D", "E"];
    let edges = [
        "FK A.other_id -> B.id",
        "FK B.other_id -> A.id",
        "FK C.other_id -> D.id",
        "FK D.other_id -> E.id",
        "FK E.other_id -> C.id",
        "FK E.other_id -> A.id",
        "FK B.other_id -> D.id",
    ];

    let mut previous = schema(&names, &[]);

    for count in 1..=edges.len() {
        let next = schema(&names, &edges[..count]);

        for (from, to) in previous.circular_deps.iter() {
            assert!(
                next.circular_deps.contains(from, to),
                "adding `{}` removed ({from}, {to})",
                edges[count - 1]
            );
        }

        previous = next;
    }

    // The final graph is one strongly connected group.
    assert_eq!(previous.circular_deps.len(), names.len() * names.len());
}

#[test]
fn result_does_not_depend_on_declaration_order() {
    let fks = [
        "FK P.other_id -> A.id",
        "FK A.other_id -> P.id",
        "FK W.other_id -> A.id",
        "FK P.other_id -> W.id",
    ];

    let forward = schema(&["P", "A", "W"], &fks);
    let backward = schema(&["W", "A", "P"], &fks);

    assert_eq!(forward.circular_deps, backward.circular_deps);
}
