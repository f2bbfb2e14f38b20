mod common;

use cmdforge_core::commands::{
    ArgumentResolver, ArgumentSpec, Command, Invocation, ResolveError, ResolvedArguments,
    SenderKind, SenderRef, Value, ValueType,
};
use common::{alice, harness, player, tokens, Harness};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

fn resolve(
    h: &Harness,
    sender: &SenderRef,
    specs: &[ArgumentSpec],
    line: &str,
) -> Result<ResolvedArguments, ResolveError> {
    let command = Command::new("tp");
    let inv = Invocation::new(&h.dispatcher, sender, &command);
    ArgumentResolver::new(inv).resolve(specs, &tokens(line))
}

fn tp_specs() -> Vec<ArgumentSpec> {
    vec![
        ArgumentSpec::player("target"),
        ArgumentSpec::player("destination").default_value("self"),
    ]
}

fn string(s: &str) -> Option<Value> {
    Some(Value::String(s.to_string()))
}

#[test]
fn teleport_defaults_to_sender() {
    let h = harness();
    let resolved = resolve(&h, &alice(), &tp_specs(), "Steve").unwrap();
    assert_eq!(
        resolved.values,
        vec![
            Some(Value::Player(player(2, "Steve"))),
            Some(Value::Player(player(1, "Alice")))
        ]
    );

    let resolved = resolve(&h, &alice(), &tp_specs(), "Steve Bob").unwrap();
    assert_eq!(
        resolved.values,
        vec![
            Some(Value::Player(player(2, "Steve"))),
            Some(Value::Player(player(3, "Bob")))
        ]
    );

    assert_eq!(
        resolve(&h, &alice(), &tp_specs(), ""),
        Err(ResolveError::MissingRequired {
            name: "target".into()
        })
    );
}

#[test]
fn resolution_is_repeatable() {
    let h = harness();
    let first = resolve(&h, &alice(), &tp_specs(), "Steve Bob").unwrap();
    let second = resolve(&h, &alice(), &tp_specs(), "Steve Bob").unwrap();
    assert_eq!(first, second);
}

#[test]
fn greedy_takes_the_rest() {
    let h = harness();
    let specs = vec![ArgumentSpec::string("reason").greedy().optional()];
    let resolved = resolve(&h, &alice(), &specs, "spam and scams").unwrap();
    assert_eq!(resolved.values, vec![string("spam and scams")]);

    let resolved = resolve(&h, &alice(), &specs, "").unwrap();
    assert_eq!(resolved.values, vec![None]);
}

#[test]
fn rejected_optional_leaves_token_for_next() {
    let h = harness();
    let specs = vec![
        ArgumentSpec::integer("count").optional(),
        ArgumentSpec::string("message").greedy(),
    ];
    let resolved = resolve(&h, &alice(), &specs, "hello world").unwrap();
    assert_eq!(resolved.values, vec![None, string("hello world")]);

    let resolved = resolve(&h, &alice(), &specs, "3 hello world").unwrap();
    assert_eq!(
        resolved.values,
        vec![Some(Value::Integer(3)), string("hello world")]
    );
}

#[test]
fn tokens_are_claimed_by_type() {
    let h = harness();
    let specs = vec![
        ArgumentSpec::integer("amount"),
        ArgumentSpec::string("label"),
    ];
    let resolved = resolve(&h, &alice(), &specs, "apples 12").unwrap();
    assert_eq!(resolved.values, vec![Some(Value::Integer(12)), string("apples")]);

    // Strings accept anything, so the first string argument wins.
    let specs = vec![
        ArgumentSpec::string("label"),
        ArgumentSpec::integer("amount"),
    ];
    assert_eq!(
        resolve(&h, &alice(), &specs, "12 apples"),
        Err(ResolveError::ConversionFailed {
            name: "amount".into(),
            raw: "apples".into()
        })
    );
}

#[test]
fn required_conversion_failure() {
    let h = harness();
    let specs = vec![
        ArgumentSpec::integer("first").optional(),
        ArgumentSpec::integer("second"),
    ];
    assert_eq!(
        resolve(&h, &alice(), &specs, "x 5"),
        Err(ResolveError::ConversionFailed {
            name: "second".into(),
            raw: "x".into()
        })
    );
}

#[test]
fn sender_arguments_never_consume_tokens() {
    let h = harness();
    let specs = vec![
        ArgumentSpec::sender("who", ValueType::Player, &[SenderKind::Player]),
        ArgumentSpec::player("target").optional(),
    ];
    let resolved = resolve(&h, &alice(), &specs, "Steve").unwrap();
    assert_eq!(
        resolved.values,
        vec![
            Some(Value::Player(player(1, "Alice"))),
            Some(Value::Player(player(2, "Steve")))
        ]
    );

    assert_eq!(
        resolve(&h, &SenderRef::console(), &specs, "Steve"),
        Err(ResolveError::SenderMismatch {
            expected: vec![SenderKind::Player]
        })
    );
}

#[test]
fn missing_argument_permission_forces_default() {
    let h = harness();
    let specs = vec![
        ArgumentSpec::player("target"),
        ArgumentSpec::player("destination")
            .default_value("self")
            .permission(""),
    ];

    let resolved = resolve(&h, &alice(), &specs, "Steve Bob").unwrap();
    assert_eq!(
        resolved.values,
        vec![
            Some(Value::Player(player(2, "Steve"))),
            Some(Value::Player(player(1, "Alice")))
        ]
    );
    assert_eq!(resolved.gated, vec![false, true]);

    h.platform
        .grant("Alice", "forge.commands.tp.argument.destination");
    let resolved = resolve(&h, &alice(), &specs, "Steve Bob").unwrap();
    assert_eq!(resolved.values[1], Some(Value::Player(player(3, "Bob"))));
    assert_eq!(resolved.gated, vec![false, false]);
    assert!(h
        .platform
        .registered()
        .contains(&"forge.commands.tp.argument.destination".to_string()));
}

#[test]
fn options_and_flags() {
    let h = harness();
    let specs = vec![
        ArgumentSpec::player("target"),
        ArgumentSpec::string("world").option(&["world"], &["w"]),
        ArgumentSpec::new("silent", ValueType::Boolean).flag(&["silent"], &["s"]),
    ];

    let resolved = resolve(&h, &alice(), &specs, "--world nether Steve -s").unwrap();
    assert_eq!(
        resolved.values,
        vec![
            Some(Value::Player(player(2, "Steve"))),
            string("nether"),
            Some(Value::Boolean(true))
        ]
    );

    let resolved = resolve(&h, &alice(), &specs, "Steve -w=end").unwrap();
    assert_eq!(resolved.values[1], string("end"));
    assert_eq!(resolved.values[2], Some(Value::Boolean(false)));

    let resolved = resolve(&h, &alice(), &specs, "Steve").unwrap();
    assert_eq!(resolved.values[1], None);

    assert_eq!(
        resolve(&h, &alice(), &specs, "Steve --world"),
        Err(ResolveError::MissingOptionValue {
            option: "--world".into()
        })
    );
}

#[test]
fn negative_numbers_are_not_options() {
    let h = harness();
    let specs = vec![
        ArgumentSpec::integer("offset"),
        ArgumentSpec::new("silent", ValueType::Boolean).flag(&["silent"], &["s"]),
    ];
    let resolved = resolve(&h, &alice(), &specs, "-5").unwrap();
    assert_eq!(
        resolved.values,
        vec![Some(Value::Integer(-5)), Some(Value::Boolean(false))]
    );
}

#[test]
fn required_option() {
    let h = harness();
    let specs = vec![ArgumentSpec::string("world")
        .option(&["world"], &[])
        .required()];
    assert_eq!(
        resolve(&h, &alice(), &specs, ""),
        Err(ResolveError::MissingRequired {
            name: "world".into()
        })
    );
    let resolved = resolve(&h, &alice(), &specs, "--world end").unwrap();
    assert_eq!(resolved.values, vec![string("end")]);
}

#[test]
fn declared_suggestions_are_expanded_once() {
    let h = harness();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let command = Command::new("give").suggestion_provider("counts", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        vec!["16".to_string(), "64".to_string()]
    });
    let specs = vec![
        ArgumentSpec::integer("count").optional().suggest("counts"),
        ArgumentSpec::string("note").greedy(),
    ];

    let sender = alice();
    let inv = Invocation::new(&h.dispatcher, &sender, &command);
    let resolved = ArgumentResolver::new(inv)
        .resolve(&specs, &tokens("for the new base"))
        .unwrap();
    assert_eq!(resolved.values, vec![None, string("for the new base")]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
