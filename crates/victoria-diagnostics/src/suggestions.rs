//! Names people reach for from other languages, mapped to the Victoria spelling.

const SUGGESTIONS: &[(&str, &str)] = &[
    // output
    ("println", "use `print(...)`; it already ends the line"),
    ("printf", "use `print(format(\"...{}\", value))`"),
    ("printLn", "use `print(...)`"),
    ("puts", "use `print(...)`"),
    ("echo", "use `print(...)`"),
    ("console", "use `print(...)` instead of `console.log(...)`"),
    ("log", "use `print(...)` to write output"),
    ("write", "use `print(...)` to write output"),
    ("fmt", "use `format(template, args...)` or `print(...)`"),
    ("sprintf", "use `format(template, args...)`"),
    ("scanf", "use `input(prompt)` to read a line"),
    ("readline", "use `input(prompt)` to read a line"),
    ("raw_input", "use `input(prompt)`"),
    ("gets", "use `input(prompt)`"),
    // declarations
    ("var", "declare variables with `let name = value`"),
    ("val", "declare constants with `const name = value`"),
    ("final", "declare constants with `const name = value`"),
    ("function", "declare functions with `define name(params) { ... }`"),
    ("func", "declare functions with `define name(params) { ... }`"),
    ("fn", "declare functions with `define name(params) { ... }`"),
    ("def", "declare functions with `define name(params) { ... }`"),
    ("fun", "declare functions with `define name(params) { ... }`"),
    ("lambda", "write anonymous functions as `(x) => x * 2`"),
    ("class", "use `struct Name { fields }` and `define Name.method() { ... }`"),
    ("new", "instantiate structs with `Name { field: value }`"),
    ("this", "methods receive the instance as `self`"),
    ("elif", "use `else if (...) { ... }`"),
    ("elsif", "use `else if (...) { ... }`"),
    ("elseif", "use `else if (...) { ... }`"),
    ("foreach", "use `for (item in collection) { ... }`"),
    ("forEach", "use `for (item in collection) { ... }`"),
    ("until", "use `while (!condition) { ... }`"),
    ("loop", "use `while (true) { ... }` with `break`"),
    ("match", "use `switch (value) { case x { ... } }`"),
    ("except", "use `try { ... } catch (e) { ... }`"),
    ("rescue", "use `try { ... } catch (e) { ... }`"),
    ("throw", "errors propagate automatically; catch them with `try { ... } catch (e) { ... }`"),
    ("raise", "errors propagate automatically; catch them with `try { ... } catch (e) { ... }`"),
    ("import", "use `include \"module\"`"),
    ("require", "use `include \"module\"`"),
    ("using", "use `include \"module\"`"),
    // literals
    ("null", "an absent value is produced by a function with no result; compare against a function's output instead"),
    ("nil", "an absent value is produced by a function with no result; compare against a function's output instead"),
    ("None", "an absent value is produced by a function with no result; compare against a function's output instead"),
    ("undefined", "declare the variable with `let` before using it"),
    ("True", "booleans are lowercase: `true`"),
    ("False", "booleans are lowercase: `false`"),
    ("TRUE", "booleans are lowercase: `true`"),
    ("FALSE", "booleans are lowercase: `false`"),
    ("self", "`self` is only bound inside methods declared with `define Struct.method(...)`"),
    // collections
    ("length", "use `len(x)`"),
    ("size", "use `len(x)`"),
    ("count", "use `len(x)`"),
    ("strlen", "use `len(s)`"),
    ("append", "use `push(array, value)`"),
    ("add", "use `push(array, value)`"),
    ("insert", "use `push(array, value)` or `map[key] = value`"),
    ("shift", "use `first(array)` and `rest(array)`"),
    ("head", "use `first(array)`"),
    ("tail", "use `rest(array)`"),
    ("includes", "use `contains(collection, value)`"),
    ("has", "use `contains(collection, value)`"),
    ("indexOf", "use `index(collection, value)`"),
    ("find", "use `index(collection, value)` or `filter(array, fn)`"),
    ("fold", "use `reduce(array, fn, initial)`"),
    ("foldl", "use `reduce(array, fn, initial)`"),
    ("select", "use `filter(array, fn)`"),
    ("collect", "use `map(array, fn)`"),
    ("keySet", "use `keys(map)`"),
    ("items", "iterate pairs with `for (k, v in map) { ... }`"),
    ("entries", "iterate pairs with `for (k, v in map) { ... }`"),
    ("xrange", "use `range(start, end)` or `start..end`"),
    // strings and conversion
    ("toUpperCase", "use `upper(s)`"),
    ("toLowerCase", "use `lower(s)`"),
    ("toupper", "use `upper(s)`"),
    ("tolower", "use `lower(s)`"),
    ("uppercase", "use `upper(s)`"),
    ("lowercase", "use `lower(s)`"),
    ("str", "use `string(x)` to convert to a string"),
    ("toString", "use `string(x)`"),
    ("String", "use `string(x)`; type names are lowercase"),
    ("parseInt", "use `int(s)`"),
    ("atoi", "use `int(s)`"),
    ("Integer", "use `int(x)`; type names are lowercase"),
    ("parseFloat", "use `float(s)`"),
    ("atof", "use `float(s)`"),
    ("Boolean", "use `bool(x)`; type names are lowercase"),
    ("typeof", "use `type(x)`"),
    ("instanceof", "compare `type(x)` with a type name"),
    ("split_string", "use `split(s, separator)`"),
    ("implode", "use `join(array, separator)`"),
    ("explode", "use `split(s, separator)`"),
];

/// Help text for a name that is not defined, when it matches a common
/// spelling from another language.
pub fn suggestion_for(name: &str) -> Option<&'static str> {
    SUGGESTIONS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, help)| *help)
}
