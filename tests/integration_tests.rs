//! Integration tests for end-to-end lowering.
//!
//! These tests build typed programs the way the type checker hands them
//! over, lower them, and where useful execute the result through the JIT.

use inkwell::{
    context::Context,
    execution_engine::ExecutionEngine,
    targets::{InitializationConfig, Target},
    OptimizationLevel,
};
use lowering::{
    ast::{
        expressions::{BinaryOperator, ExprKind, TypedExpr},
        statements::{Declaration, FunctionDecl, TypeDecl, TypedStmt},
        types::Type,
    },
    compile, CompileOptions, Compiler,
};
use pretty_assertions::assert_eq;

fn int_var(name: &str) -> TypedExpr {
    TypedExpr::symbol(Type::Integer, name)
}

fn int_binary(left: TypedExpr, operator: BinaryOperator, right: TypedExpr) -> TypedExpr {
    TypedExpr::binary(Type::Integer, left, operator, right)
}

fn bool_binary(left: TypedExpr, operator: BinaryOperator, right: TypedExpr) -> TypedExpr {
    TypedExpr::binary(Type::Boolean, left, operator, right)
}

fn assign(name: &str, value: TypedExpr) -> TypedStmt {
    TypedStmt::expression(TypedExpr::assign(name, value))
}

fn jit<'a>(compiler: &Compiler<'a>) -> ExecutionEngine<'a> {
    Target::initialize_native(&InitializationConfig::default()).unwrap();
    compiler
        .module
        .create_jit_execution_engine(OptimizationLevel::None)
        .unwrap()
}

/// fact(n): if n < 2: return 1 else: return n * fact(n - 1)
fn factorial() -> Declaration {
    FunctionDecl::new(
        "fact",
        Type::Integer,
        vec![(Type::Integer, String::from("n"))],
        vec![TypedStmt::if_else(
            bool_binary(int_var("n"), BinaryOperator::Less, TypedExpr::integer(2)),
            TypedStmt::block(vec![TypedStmt::ret(TypedExpr::integer(1))]),
            TypedStmt::block(vec![TypedStmt::ret(int_binary(
                int_var("n"),
                BinaryOperator::Mul,
                TypedExpr::call(
                    Type::Integer,
                    "fact",
                    vec![int_binary(
                        int_var("n"),
                        BinaryOperator::Sub,
                        TypedExpr::integer(1),
                    )],
                ),
            ))]),
        )],
    )
    .into()
}

#[test]
fn test_forward_reference() {
    // main calls fact, which is declared after it
    let program = vec![
        FunctionDecl::new(
            "main",
            Type::Integer,
            vec![],
            vec![TypedStmt::ret(TypedExpr::call(
                Type::Integer,
                "fact",
                vec![TypedExpr::integer(5)],
            ))],
        )
        .into(),
        factorial(),
    ];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let engine = jit(&compiler);
    let main = unsafe {
        engine
            .get_function::<unsafe extern "C" fn() -> i64>("main")
            .unwrap()
    };
    assert_eq!(unsafe { main.call() }, 120);
}

#[test]
fn test_duplicate_function_name_later_wins() {
    let constant = |value: i64| -> Declaration {
        FunctionDecl::new(
            "g",
            Type::Integer,
            vec![],
            vec![TypedStmt::ret(TypedExpr::integer(value))],
        )
        .into()
    };
    let program = vec![
        constant(1),
        FunctionDecl::new(
            "main",
            Type::Integer,
            vec![],
            vec![TypedStmt::ret(TypedExpr::call(Type::Integer, "g", vec![]))],
        )
        .into(),
        constant(2),
    ];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    // Both bodies are kept; the second prototype is renamed
    assert!(compiler.module.get_function("g").is_some());
    assert!(compiler.module.get_function("g.1").is_some());
    assert_eq!(compiler.registry.function_count(), 2);

    let engine = jit(&compiler);
    let main = unsafe {
        engine
            .get_function::<unsafe extern "C" fn() -> i64>("main")
            .unwrap()
    };
    assert_eq!(unsafe { main.call() }, 2);
}

#[test]
fn test_mutual_recursion() {
    // is_even(n): if n == 0: return true else: return is_odd(n - 1)
    // is_odd(n): if n == 0: return false else: return is_even(n - 1)
    let parity = |name: &str, other: &str, base: bool| -> Declaration {
        FunctionDecl::new(
            name,
            Type::Boolean,
            vec![(Type::Integer, String::from("n"))],
            vec![TypedStmt::if_else(
                bool_binary(int_var("n"), BinaryOperator::Equal, TypedExpr::integer(0)),
                TypedStmt::ret(TypedExpr::boolean(base)),
                TypedStmt::ret(TypedExpr::call(
                    Type::Boolean,
                    other,
                    vec![int_binary(
                        int_var("n"),
                        BinaryOperator::Sub,
                        TypedExpr::integer(1),
                    )],
                )),
            )],
        )
        .into()
    };
    let program = vec![
        parity("is_even", "is_odd", true),
        parity("is_odd", "is_even", false),
        // Wrap the boolean so the JIT returns a full width integer
        FunctionDecl::new(
            "check",
            Type::Integer,
            vec![(Type::Integer, String::from("n"))],
            vec![
                assign("result", TypedExpr::integer(0)),
                TypedStmt::if_then(
                    TypedExpr::call(Type::Boolean, "is_even", vec![int_var("n")]),
                    assign("result", TypedExpr::integer(1)),
                ),
                TypedStmt::ret(int_var("result")),
            ],
        )
        .into(),
    ];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let engine = jit(&compiler);
    let check = unsafe {
        engine
            .get_function::<unsafe extern "C" fn(i64) -> i64>("check")
            .unwrap()
    };
    assert_eq!(unsafe { check.call(10) }, 1);
    assert_eq!(unsafe { check.call(7) }, 0);
}

#[test]
fn test_swap() {
    // a = 3; b = 4; swap(a, b); return a * 10 + b
    let program = vec![FunctionDecl::new(
        "swapped",
        Type::Integer,
        vec![],
        vec![
            assign("a", TypedExpr::integer(3)),
            assign("b", TypedExpr::integer(4)),
            TypedStmt::expression(TypedExpr::swap(Type::Integer, "a", "b")),
            TypedStmt::ret(int_binary(
                int_binary(int_var("a"), BinaryOperator::Mul, TypedExpr::integer(10)),
                BinaryOperator::Add,
                int_var("b"),
            )),
        ],
    )
    .into()];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let engine = jit(&compiler);
    let swapped = unsafe {
        engine
            .get_function::<unsafe extern "C" fn() -> i64>("swapped")
            .unwrap()
    };
    assert_eq!(unsafe { swapped.call() }, 43);
}

#[test]
fn test_while_loop_sum() {
    // i = 0; total = 0
    // while i < n: i = i + 1; total = total + i
    // return total
    let program = vec![FunctionDecl::new(
        "sum",
        Type::Integer,
        vec![(Type::Integer, String::from("n"))],
        vec![
            assign("i", TypedExpr::integer(0)),
            assign("total", TypedExpr::integer(0)),
            TypedStmt::while_loop(
                bool_binary(int_var("i"), BinaryOperator::Less, int_var("n")),
                TypedStmt::block(vec![
                    assign(
                        "i",
                        int_binary(int_var("i"), BinaryOperator::Add, TypedExpr::integer(1)),
                    ),
                    assign(
                        "total",
                        int_binary(int_var("total"), BinaryOperator::Add, int_var("i")),
                    ),
                ]),
            ),
            TypedStmt::ret(int_var("total")),
        ],
    )
    .into()];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let engine = jit(&compiler);
    let sum = unsafe {
        engine
            .get_function::<unsafe extern "C" fn(i64) -> i64>("sum")
            .unwrap()
    };
    assert_eq!(unsafe { sum.call(10) }, 55);
    assert_eq!(unsafe { sum.call(0) }, 0);
}

#[test]
fn test_floating_promotion_result() {
    // return 1 + 2.5, and a promoted division over a parameter
    let program = vec![
        FunctionDecl::new(
            "mixed",
            Type::Floating,
            vec![],
            vec![TypedStmt::ret(TypedExpr::binary(
                Type::Floating,
                TypedExpr::integer(1),
                BinaryOperator::Add,
                TypedExpr::floating(2.5),
            ))],
        )
        .into(),
        FunctionDecl::new(
            "half",
            Type::Floating,
            vec![(Type::Integer, String::from("x"))],
            vec![TypedStmt::ret(TypedExpr::binary(
                Type::Floating,
                int_var("x"),
                BinaryOperator::Div,
                TypedExpr::floating(2.0),
            ))],
        )
        .into(),
    ];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let engine = jit(&compiler);
    let mixed = unsafe {
        engine
            .get_function::<unsafe extern "C" fn() -> f64>("mixed")
            .unwrap()
    };
    let half = unsafe {
        engine
            .get_function::<unsafe extern "C" fn(i64) -> f64>("half")
            .unwrap()
    };
    assert_eq!(unsafe { mixed.call() }, 3.5);
    assert_eq!(unsafe { half.call(5) }, 2.5);
}

#[test]
fn test_assignment_is_an_expression() {
    // return (x = 7) + x
    let program = vec![FunctionDecl::new(
        "chained",
        Type::Integer,
        vec![],
        vec![TypedStmt::ret(int_binary(
            TypedExpr::assign("x", TypedExpr::integer(7)),
            BinaryOperator::Add,
            int_var("x"),
        ))],
    )
    .into()];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let engine = jit(&compiler);
    let chained = unsafe {
        engine
            .get_function::<unsafe extern "C" fn() -> i64>("chained")
            .unwrap()
    };
    assert_eq!(unsafe { chained.call() }, 14);
}

#[test]
fn test_variable_first_written_in_branch() {
    // if flag: x = 1 else: x = 2
    // return x
    let program = vec![FunctionDecl::new(
        "pick",
        Type::Integer,
        vec![(Type::Integer, String::from("flag"))],
        vec![
            TypedStmt::if_else(
                bool_binary(int_var("flag"), BinaryOperator::NotEqual, TypedExpr::integer(0)),
                assign("x", TypedExpr::integer(1)),
                assign("x", TypedExpr::integer(2)),
            ),
            TypedStmt::ret(int_var("x")),
        ],
    )
    .into()];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let engine = jit(&compiler);
    let pick = unsafe {
        engine
            .get_function::<unsafe extern "C" fn(i64) -> i64>("pick")
            .unwrap()
    };
    assert_eq!(unsafe { pick.call(1) }, 1);
    assert_eq!(unsafe { pick.call(0) }, 2);
}

#[test]
fn test_void_call_in_statement_position() {
    let program = vec![
        FunctionDecl::new(
            "caller",
            Type::Integer,
            vec![],
            vec![
                TypedStmt::expression(TypedExpr::call(Type::Void, "noop", vec![])),
                TypedStmt::ret(TypedExpr::integer(9)),
            ],
        )
        .into(),
        FunctionDecl::new("noop", Type::Void, vec![], vec![]).into(),
    ];

    let context = Context::create();
    let compiler = compile(&program, CompileOptions::default(), &context).unwrap();

    let ir = compiler.print_to_string();
    assert!(ir.contains("call void @noop()"));
}

#[test]
fn test_lowering_is_deterministic() {
    let program = vec![
        FunctionDecl::new(
            "main",
            Type::Integer,
            vec![],
            vec![TypedStmt::ret(TypedExpr::call(
                Type::Integer,
                "fact",
                vec![TypedExpr::integer(5)],
            ))],
        )
        .into(),
        factorial(),
        Declaration::Type(TypeDecl {
            name: String::from("Point"),
            fields: vec![
                (Type::Floating, String::from("x")),
                (Type::Floating, String::from("y")),
            ],
        }),
    ];

    let first_context = Context::create();
    let first = compile(&program, CompileOptions::default(), &first_context).unwrap();

    let second_context = Context::create();
    let second = compile(&program, CompileOptions::default(), &second_context).unwrap();

    assert_eq!(first.print_to_string(), second.print_to_string());
}

#[test]
fn test_fatal_failures_return_no_module() {
    let failing = vec![
        (
            "UnsupportedConstruct",
            TypedStmt::expression(TypedExpr::new(
                Type::array_of(Type::Integer),
                ExprKind::ArrayLiteral(vec![TypedExpr::integer(1), TypedExpr::integer(2)]),
            )),
        ),
        (
            "UnsupportedConstruct",
            TypedStmt::For {
                variable: String::from("i"),
                start: TypedExpr::integer(0),
                end: TypedExpr::integer(3),
                descending: false,
                body: Box::new(TypedStmt::block(vec![])),
            },
        ),
        (
            "UndeclaredReference",
            TypedStmt::expression(TypedExpr::call(Type::Integer, "missing", vec![])),
        ),
    ];

    for (expected, statement) in failing {
        // A valid function before the failing one must not rescue the build
        let program = vec![
            FunctionDecl::new("ok", Type::Void, vec![], vec![]).into(),
            FunctionDecl::new("broken", Type::Void, vec![], vec![statement]).into(),
        ];

        let context = Context::create();
        let result = compile(&program, CompileOptions::default(), &context);

        match result {
            Ok(_) => panic!("Expected {} failure", expected),
            Err(error) => {
                assert_eq!(error.get_error_name(), expected);
                assert_eq!(error.get_function(), Some("broken"));
            }
        }
    }
}

#[test]
fn test_host_target_configuration() {
    let program = vec![FunctionDecl::new("f", Type::Void, vec![], vec![]).into()];

    let context = Context::create();
    let compiler = compile(
        &program,
        CompileOptions::new()
            .with_module_name("hosted")
            .with_host_target(true),
        &context,
    )
    .unwrap();

    let ir = compiler.print_to_string();
    assert!(ir.contains("; ModuleID = 'hosted'"));
    assert!(ir.contains("target triple"));
    assert!(ir.contains("target datalayout"));
}
