// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// `name: "input" => [kinds...]`
macro_rules! lex_tests {
    ($($name:ident: $input:expr => [$($token:expr),* $(,)?]),* $(,)?) => {$(
        #[test]
        fn $name() {
            let expected: Vec<TokenKind> = vec![$($token),*];
            assert_eq!(super::kinds($input), expected, "input: {:?}", $input);
        }
    )*};
}

/// `name: "input" => ErrorPattern`
macro_rules! lex_error_tests {
    ($($name:ident: $input:expr => $error:pat),* $(,)?) => {$(
        #[test]
        fn $name() {
            let result = Lexer::tokenize($input);
            assert!(matches!(result, Err($error)), "input {:?} gave {:?}", $input, result);
        }
    )*};
}

/// `name: "input" => [(start, end)...]`
macro_rules! span_tests {
    ($($name:ident: $input:expr => [$(($start:expr, $end:expr)),* $(,)?]),* $(,)?) => {$(
        #[test]
        fn $name() {
            let expected: Vec<(usize, usize)> = vec![$(($start, $end)),*];
            assert_eq!(super::spans($input), expected, "input: {:?}", $input);
        }
    )*};
}
