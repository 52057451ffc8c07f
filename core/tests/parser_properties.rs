use ssalang_core::ast::AstNode;
use ssalang_core::parse::{self, MAX_DEPTH, Parser, Rule};
use ssalang_core::token::tokenize;

fn parse_block(src: &str) -> Result<AstNode, parse::SyntaxError> {
    let tokens = tokenize(src).expect("tokenize");
    parse::parse_rule(&tokens, Rule::Block)
}

#[test]
fn addition_is_right_associative() {
    let ast = parse_block("1+2+3").expect("parse");
    let expected = AstNode::add(AstNode::integer(1), AstNode::add(AstNode::integer(2), AstNode::integer(3)));
    assert_eq!(ast, expected);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let ast = parse_block("1*2+3").expect("parse");
    let expected = AstNode::add(AstNode::mul(AstNode::integer(1), AstNode::integer(2)), AstNode::integer(3));
    assert_eq!(ast, expected);
}

#[test]
fn while_loop_body() {
    let ast = parse_block("while 1 { 2 }").expect("parse");
    assert_eq!(ast, AstNode::while_loop(AstNode::integer(1), AstNode::integer(2)));
}

#[test]
fn let_binding() {
    let ast = parse_block("let x = 10").expect("parse");
    assert_eq!(ast, AstNode::let_binding("x", AstNode::integer(10)));
}

#[test]
fn call_arguments_need_trailing_commas() {
    let ast = parse_block("f(123,456,)").expect("parse");
    assert_eq!(ast, AstNode::call("f", vec![AstNode::integer(123), AstNode::integer(456)]));

    let err = parse_block("f(123,456)").expect_err("missing trailing comma must not parse");
    assert!(err.to_string().contains("Trailing tokens"), "{}", err);
}

#[test]
fn comparison_chains_to_the_right() {
    let ast = parse_block("a < b == c").expect("parse");
    let expected = AstNode::less(
        AstNode::variable("a"),
        AstNode::equal(AstNode::variable("b"), AstNode::variable("c")),
    );
    assert_eq!(ast, expected);
}

#[test]
fn if_condition_may_be_a_block() {
    let ast = parse_block("if let y = 1; y { 2 } else { 3 }").expect("parse");
    let cond = AstNode::sequence(AstNode::let_binding("y", AstNode::integer(1)), AstNode::variable("y"));
    assert_eq!(ast, AstNode::if_else(cond, AstNode::integer(2), AstNode::integer(3)));
}

#[test]
fn program_of_functions() {
    let tokens = tokenize("func id(a,) { a } func main() { id(1,) }").expect("tokenize");
    let ast = parse::parse(&tokens).expect("parse");
    let expected = AstNode::definitions(vec![
        AstNode::func("id", &["a"], AstNode::variable("a")),
        AstNode::func("main", &[], AstNode::call("id", vec![AstNode::integer(1)])),
    ]);
    assert_eq!(ast, expected);
}

#[test]
fn empty_program_has_no_definitions() {
    let ast = parse::parse(&[]).expect("parse");
    assert_eq!(ast, AstNode::definitions(vec![]));
}

#[test]
fn unclosed_function_reports_error() {
    let tokens = tokenize("func main() { 1").expect("tokenize");
    let err = parse::parse(&tokens).expect_err("unclosed body");
    assert!(err.to_string().starts_with("Trailing tokens"), "{}", err);
    assert_eq!(err.position(), tokens.len());
}

#[test]
fn dangling_operator_reports_furthest_position() {
    // `1` parses as a statement; the `+` branch gave up looking past the end.
    let err = parse_block("1 +").expect_err("dangling operator");
    assert!(err.to_string().starts_with("Trailing tokens"), "{}", err);
    assert_eq!(err.position(), 2);
}

#[test]
fn no_alternative_at_first_token() {
    let err = parse_block("+").expect_err("no statement starts with +");
    assert!(err.to_string().starts_with("No alternative matched."), "{}", err);
    assert_eq!(err.position(), 0);
}

#[test]
fn input_ending_inside_a_rule() {
    let tokens = tokenize("f(").expect("tokenize");
    let err = parse::parse_rule(&tokens, Rule::Call).expect_err("unclosed call");
    assert!(err.to_string().starts_with("Unexpected end of input."), "{}", err);
    assert_eq!(err.position(), 2);

    let err = parse::parse_rule(&[], Rule::Block).expect_err("empty block");
    assert!(err.to_string().starts_with("Unexpected end of input."), "{}", err);
}

/// Run `f` with room for the parser's full depth bound.
fn with_large_stack<F: FnOnce() + Send + 'static>(f: F) {
    std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(f)
        .expect("spawn")
        .join()
        .expect("join");
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    with_large_stack(|| {
        let src = vec!["1"; MAX_DEPTH + 10].join("+");
        let err = parse_block(&src).expect_err("too deep");
        assert!(err.to_string().contains("nested too deeply"), "{}", err);
    });
}

#[test]
fn long_chain_below_the_bound_parses() {
    with_large_stack(|| {
        let src = vec!["1"; 1000].join("+");
        let ast = parse_block(&src).expect("parse");
        assert!(matches!(ast, AstNode::BinaryOp { .. }));
    });
}

#[test]
fn integer_overflow_is_a_syntax_error() {
    assert!(parse_block("2147483648").is_err());
    assert_eq!(parse_block("2147483647").expect("parse"), AstNode::integer(i32::MAX));
}

#[test]
fn memoized_rule_runs_once_per_position() {
    let tokens = tokenize("1+2").expect("tokenize");
    let mut parser = Parser::new(&tokens);
    parser.parse_root(Rule::Block).expect("parse");

    // Comparison and ArithExpr both start with ArithExpr at 0; Block tries
    // Statement at 0 in both of its alternatives.
    assert_eq!(parser.evaluations(Rule::ArithExpr, 0), 1);
    assert_eq!(parser.evaluations(Rule::Statement, 0), 1);
    assert!(parser.cache_hits() >= 2, "cache hits: {}", parser.cache_hits());
}

#[test]
fn failing_alternatives_run_once_under_a_cached_parent() {
    let tokens = tokenize("1").expect("tokenize");
    let mut parser = Parser::new(&tokens);
    parser.parse_root(Rule::Block).expect("parse");

    // WhileStmt fails at 0 and is not cached, but Statement itself is, so
    // it is only evaluated once here.
    assert_eq!(parser.evaluations(Rule::WhileStmt, 0), 1);
    assert_eq!(parser.evaluations(Rule::Comparison, 0), 1);
}
