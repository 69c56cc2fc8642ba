use pretty_assertions::assert_eq;
use semtree::{
    error::{Error, ParseError, RuntimeError},
    interpreter::console::BufferConsole,
    parse_source, run_source,
};

fn run_with_input(src: &str, input: &[&str]) -> (Result<(), Error>, Vec<String>) {
    let mut console = BufferConsole::with_input(input.iter().copied());
    let result = run_source(src, &mut console);
    (result, console.output().to_vec())
}

fn assert_output(src: &str, expected: &[&str]) {
    assert_output_with_input(src, &[], expected);
}

fn assert_output_with_input(src: &str, input: &[&str], expected: &[&str]) {
    match run_with_input(src, input) {
        (Ok(()), output) => assert_eq!(output, expected),
        (Err(e), _) => panic!("Script failed: {e}"),
    }
}

fn assert_success(src: &str) {
    if let (Err(e), _) = run_with_input(src, &[]) {
        panic!("Script failed: {e}");
    }
}

fn assert_failure(src: &str) -> Error {
    match run_with_input(src, &[]) {
        (Ok(()), _) => panic!("Script succeeded but was expected to fail"),
        (Err(e), _) => e,
    }
}

#[test]
fn module_variables_and_let() {
    assert_output("module M;
                   variable integer x := 5;
                   variable integer y := 10;
                   beginning
                     let x := x + y;
                     output x;
                   end M.",
                  &["15"]);
}

#[test]
fn function_call_with_in_parameters() {
    assert_output("module M;
                   variable integer x := 5;
                   variable integer y := 10;
                   function public add(in integer a, in integer b) : integer
                     return a + b;
                   end add;
                   beginning
                     output add(x, y);
                   end M.",
                  &["15"]);
}

#[test]
fn else_runs_when_no_condition_holds() {
    assert_output("module M;
                   beginning
                     if false then
                       output \"if\";
                     elseif false then
                       output \"elseif\";
                     else
                       output \"else\";
                     end if;
                   end M.",
                  &["else"]);
}

#[test]
fn first_true_branch_wins() {
    assert_output("module M;
                   variable integer n := 7;
                   beginning
                     if n < 5 then
                       output \"small\";
                     elseif n < 10 then
                       output \"medium\";
                     elseif n < 100 then
                       output \"large\";
                     end if;
                   end M.",
                  &["medium"]);
}

#[test]
fn while_with_false_condition_never_runs() {
    assert_output("module M;
                   beginning
                     output \"before\";
                     while false repeat
                       output \"body\";
                     end while;
                     output \"after\";
                   end M.",
                  &["before", "after"]);
}

#[test]
fn while_counts() {
    assert_output("module M;
                   variable integer i := 0;
                   beginning
                     while i < 3 repeat
                       output i;
                       let i := i + 1;
                     end while;
                   end M.",
                  &["0", "1", "2"]);
}

#[test]
fn return_inside_loop_stops_the_function() {
    assert_output("module M;
                   function public first_over(in integer limit) : integer
                     variable integer i := 0;
                     while true repeat
                       let i := i + 1;
                       if i > limit then
                         return i;
                       end if;
                       output i;
                     end while;
                     return -1;
                   end first_over;
                   beginning
                     output first_over(2);
                   end M.",
                  &["1", "2", "3"]);
}

#[test]
fn procedure_without_return_yields_zero() {
    assert_output("module M;
                   procedure public noop()
                   end noop;
                   beginning
                     output noop();
                   end M.",
                  &["0"]);
}

#[test]
fn function_without_return_yields_zero_whatever_its_type() {
    assert_output("module M;
                   function public label() : string
                   end label;
                   beginning
                     output label();
                   end M.",
                  &["0"]);
    assert_output("module M;
                   function public check() : boolean
                     output \"side effect\";
                   end check;
                   beginning
                     call check();
                     output \"after\";
                   end M.",
                  &["side effect", "after"]);
}

#[test]
fn nested_array_rows_are_independent() {
    assert_output("module M;
                   variable array[2][3] of integer m;
                   beginning
                     let m[0][1] := 7;
                     output m[0][1];
                     output m[1][1];
                     output m[0];
                   end M.",
                  &["7", "0", "[0, 7, 0]"]);
}

#[test]
fn array_sizes_can_be_constant_expressions() {
    assert_output("module M;
                   variable array[2 * 2] of char letters;
                   beginning
                     let letters[3] := 'z';
                     output letters[3];
                   end M.",
                  &["z"]);
}

#[test]
fn redeclared_function_fails_before_running() {
    let src = "module M;
               procedure public p() end p;
               function public p() : integer return 1; end p;
               beginning
                 output \"never\";
               end M.";
    let (result, output) = run_with_input(src, &[]);

    assert!(matches!(result,
                     Err(Error::Parse(ParseError::FunctionAlreadyDefined { .. }))));
    assert!(output.is_empty());
}

#[test]
fn arity_error_names_missing_parameters() {
    let err = assert_failure("module M;
                              function public add(in integer a, in integer b, in integer c) : integer
                                return a + b + c;
                              end add;
                              beginning
                                output add(1);
                              end M.");

    assert_eq!(err.to_string(),
               "Error on line 6: 'add' expects 3 argument(s), but 1 were given. Missing: 'b', 'c'.");
}

#[test]
fn same_name_in_sibling_blocks_gets_distinct_ids() {
    let program = parse_source("module M;
                                beginning
                                  if true then
                                    variable integer t := 1;
                                    output t;
                                  end if;
                                  if true then
                                    variable integer t := 2;
                                    output t;
                                  end if;
                                end M.").unwrap();

    assert!(program.variables.contains("M^beginning^if1^t"));
    assert!(program.variables.contains("M^beginning^if2^t"));
}

#[test]
fn runs_are_deterministic() {
    let src = "module M;
               variable integer total := 0;
               variable integer i := 1;
               beginning
                 while i <= 4 repeat
                   let total := total + i * i;
                   output total;
                   let i := i + 1;
                 end while;
               end M.";

    let first = run_with_input(src, &[]).1;
    let second = run_with_input(src, &[]).1;
    assert_eq!(first, second);
    assert_eq!(first, ["1", "5", "14", "30"]);
}

#[test]
fn recursion_keeps_locals_per_call() {
    assert_output("module M;
                   function public fact(in integer n) : integer
                     variable integer rest := 1;
                     if n > 1 then
                       let rest := fact(n - 1);
                     end if;
                     return n * rest;
                   end fact;
                   beginning
                     output fact(5);
                   end M.",
                  &["120"]);
}

#[test]
fn var_parameters_write_back_through_nested_calls() {
    assert_output("module M;
                   procedure public inc(var integer n)
                     let n := n + 1;
                   end inc;
                   procedure public twice(var integer n)
                     call inc(n);
                     call inc(n);
                   end twice;
                   beginning
                     variable integer x := 1;
                     call twice(x);
                     output x;
                   end M.",
                  &["3"]);
}

#[test]
fn var_parameters_swap_caller_variables() {
    assert_output("module M;
                   procedure public swap(var integer a, var integer b)
                     variable integer t := a;
                     let a := b;
                     let b := t;
                   end swap;
                   variable integer x := 1;
                   variable integer y := 2;
                   beginning
                     call swap(x, y);
                     output x;
                     output y;
                   end M.",
                  &["2", "1"]);
}

#[test]
fn var_parameter_requires_matching_type() {
    let err = assert_failure("module M;
                              procedure public inc(var integer n)
                                let n := n + 1;
                              end inc;
                              variable real r;
                              beginning
                                call inc(r);
                              end M.");

    assert!(matches!(err, Error::Runtime(RuntimeError::TypeError { .. })));
}

#[test]
fn in_parameters_cannot_be_assigned() {
    let err = assert_failure("module M;
                              procedure public p(in integer n)
                                let n := 2;
                              end p;
                              beginning end M.");

    assert!(matches!(err, Error::Parse(ParseError::ReadOnlyParameter { .. })));
}

#[test]
fn input_converts_by_declared_type() {
    assert_output_with_input("module M;
                              variable integer i;
                              variable real r;
                              variable string s;
                              variable boolean b;
                              beginning
                                input i;
                                input r;
                                input s;
                                input b;
                                output i + 1;
                                output r * 2;
                                output s;
                                output not b;
                              end M.",
                             &["41", "2.25", "hello world", "false"],
                             &["42", "4.5", "hello world", "true"]);
}

#[test]
fn invalid_input_is_reported() {
    let (result, _) = run_with_input("module M;
                                      variable integer i;
                                      beginning input i; end M.",
                                     &["abc"]);

    assert!(matches!(result, Err(Error::Runtime(RuntimeError::InvalidInput { .. }))));
}

#[test]
fn running_out_of_input_is_an_io_error() {
    let (result, _) = run_with_input("module M; variable char c; beginning input c; end M.", &[]);

    assert!(matches!(result, Err(Error::Runtime(RuntimeError::Io { .. }))));
}

#[test]
fn division_by_zero_keeps_earlier_output() {
    let (result, output) = run_with_input("module M;
                                           beginning
                                             output 1;
                                             output 1 / 0;
                                           end M.",
                                          &[]);

    assert!(matches!(result, Err(Error::Runtime(RuntimeError::DivisionByZero { line: 4 }))));
    assert_eq!(output, ["1"]);
}

#[test]
fn index_out_of_bounds() {
    let err = assert_failure("module M;
                              variable array[3] of integer a;
                              beginning
                                output a[3];
                              end M.");

    assert!(matches!(err,
                     Error::Runtime(RuntimeError::IndexOutOfBounds { len: 3, found: 3, .. })));
    assert!(matches!(assert_failure("module M;
                                     variable array[3] of integer a;
                                     beginning let a[-1] := 1; end M."),
                     Error::Runtime(RuntimeError::IndexOutOfBounds { .. })));
}

#[test]
fn conditions_must_be_boolean() {
    assert!(matches!(assert_failure("module M; beginning if 1 then output 1; end if; end M."),
                     Error::Runtime(RuntimeError::ExpectedBoolean { .. })));
    assert!(matches!(assert_failure("module M; beginning output true and 1; end M."),
                     Error::Runtime(RuntimeError::ExpectedBoolean { .. })));
}

#[test]
fn stores_are_type_checked() {
    assert!(matches!(assert_failure("module M; variable integer x; beginning let x := \"five\"; end M."),
                     Error::Runtime(RuntimeError::TypeError { .. })));
    assert!(matches!(assert_failure("module M; beginning output 1 + \"a\"; end M."),
                     Error::Runtime(RuntimeError::TypeError { .. })));
    assert_output("module M; variable real r := 2; beginning output r / 4; end M.", &["0.5"]);
}

#[test]
fn integer_and_real_arithmetic() {
    assert_output("module M;
                   beginning
                     output 7 / 2;
                     output 7.0 / 2;
                     output -7 / 2;
                     output 2 + 3 * 4;
                     output (2 + 3) * 4;
                     output 1.5e1;
                   end M.",
                  &["3", "3.5", "-3", "14", "20", "15"]);
}

#[test]
fn integer_overflow_is_an_error() {
    assert!(matches!(assert_failure("module M; variable integer big := 2147483647; beginning output big + 1; end M."),
                     Error::Runtime(RuntimeError::Overflow { .. })));
}

#[test]
fn literal_range_is_checked_at_parse_time() {
    assert_output("module M; beginning output -2147483648; output -2147483648 + 1; end M.",
                  &["-2147483648", "-2147483647"]);
    assert!(matches!(assert_failure("module M; beginning output 1e400; end M."),
                     Error::Parse(ParseError::LiteralTooLarge { .. })));
}

#[test]
fn strings_and_chars() {
    assert_output("module M;
                   variable string greeting := \"hello\";
                   variable char bang := '!';
                   beginning
                     output greeting + \", world\" + bang;
                     output \"tab\\there\";
                     output \"apple\" < \"pear\";
                     output 'a' = \"a\";
                   end M.",
                  &["hello, world!", "tab\there", "true", "true"]);
}

#[test]
fn comments_are_ignored() {
    assert_output("module M; // the module
                   beginning
                     // nothing here
                     output 1; // trailing
                   end M.",
                  &["1"]);
}

#[test]
fn resolution_errors_are_reported_at_parse_time() {
    assert!(matches!(assert_failure("module M; beginning output y; end M."),
                     Error::Parse(ParseError::UnknownIdentifier { .. })));
    assert!(matches!(assert_failure("module M; beginning call missing(); end M."),
                     Error::Parse(ParseError::UnknownFunction { .. })));
    assert!(matches!(assert_failure("module M;
                                     beginning
                                       if true then variable integer t; end if;
                                       output t;
                                     end M."),
                     Error::Parse(ParseError::UnknownIdentifier { .. })));
}

#[test]
fn mismatched_closers_fail() {
    assert!(matches!(assert_failure("module M; beginning end N."),
                     Error::Parse(ParseError::MismatchedEnd { .. })));
    assert!(matches!(assert_failure("module M; procedure public p() end q; beginning end M."),
                     Error::Parse(ParseError::MismatchedEnd { .. })));
}

#[test]
fn redeclaring_in_the_same_block_fails() {
    assert!(matches!(assert_failure("module M; variable integer x; variable real x; beginning end M."),
                     Error::Parse(ParseError::VariableAlreadyDeclared { .. })));
}

#[test]
fn inner_blocks_shadow_outer_variables() {
    assert_output("module M;
                   variable integer x := 1;
                   beginning
                     if true then
                       variable integer x := 2;
                       output x;
                     end if;
                     output x;
                   end M.",
                  &["2", "1"]);
}

#[test]
fn function_results_follow_the_declared_type() {
    assert_output("module M;
                   function public half(in integer n) : real
                     return n / 2;
                   end half;
                   beginning
                     output half(5);
                   end M.",
                  &["2"]);
    assert!(matches!(assert_failure("module M;
                                     function public bad() : integer
                                       return \"no\";
                                     end bad;
                                     beginning output bad(); end M."),
                     Error::Runtime(RuntimeError::TypeError { .. })));
}

#[test]
fn empty_program_succeeds() {
    assert_success("module Empty; beginning end Empty.");
}
