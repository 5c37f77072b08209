//! ES5 rendering of a desugared class.
//!
//! The output shows the shape a class lowers to: a constructor function
//! with the invocation guard, per-instance field initialization and one
//! `Object.defineProperty` call per method table entry.
//!
//! ```javascript
//! var Person = /** @class */ (function () {
//!     function Person(name) {
//!         if (!(this instanceof Person)) {
//!             throw new TypeError("Class constructor Person cannot be invoked without instantiation");
//!         }
//!         [native code]
//!     }
//!     Object.defineProperty(Person.prototype, "DigaOla", {
//!         value: function DigaOla() { [native code] },
//!         writable: true,
//!         enumerable: false,
//!         configurable: true
//!     });
//!     return Person;
//! }());
//! ```
//!
//! Bodies are native closures, so they render as `[native code]`.

use crate::class::Constructible;
use crate::method_table::{PropertyFlags, TableEntry};
use crate::value::Function;
use classdown_common::{PropertyKey, Symbol};

/// Name used for anonymous classes.
const ANONYMOUS_CLASS_NAME: &str = "class_1";

pub fn render_es5(class: &Constructible) -> String {
    let mut printer = Es5Printer::new();
    printer.emit_class(class);
    printer.output
}

struct Es5Printer {
    output: String,
    indent_level: u32,
    /// Symbol keys hoisted into `_a`, `_b`, ... temporaries.
    symbols: Vec<(Symbol, String)>,
}

impl Es5Printer {
    fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            symbols: Vec::new(),
        }
    }

    fn emit_class(&mut self, class: &Constructible) {
        let name = if class.name().is_empty() {
            ANONYMOUS_CLASS_NAME.to_string()
        } else {
            class.name().to_string()
        };
        let table = class.method_table();
        self.collect_symbols(
            table
                .keys()
                .chain(class.field_initializers().iter().map(|field| field.key())),
        );

        self.write("var ");
        self.write(&name);
        self.write(" = /** @class */ (function () {");
        self.write_line();
        self.increase_indent();

        for index in 0..self.symbols.len() {
            let (symbol, temp) = self.symbols[index].clone();
            self.write_indent();
            self.write(&format!("var {temp} = Symbol("));
            if let Some(description) = symbol.description() {
                self.write("\"");
                self.write_escaped(description);
                self.write("\"");
            }
            self.write(");");
            self.write_line();
        }

        self.emit_constructor(class, &name);

        for (key, entry, flags) in table.entries() {
            match entry {
                // Already present on every ES5 prototype.
                TableEntry::Constructor => {}
                TableEntry::Method(function) => {
                    self.emit_define_property_open(&name, key);
                    self.write_indent();
                    self.write("value: ");
                    self.emit_function_stub(function, true);
                    self.write(",");
                    self.write_line();
                    self.write_indent();
                    self.write(&format!("writable: {},", flags.contains(PropertyFlags::WRITABLE)));
                    self.write_line();
                    self.emit_define_property_close(flags);
                }
                TableEntry::Accessor(pair) => {
                    self.emit_define_property_open(&name, key);
                    for (label, side) in [("get", pair.getter()), ("set", pair.setter())] {
                        let Some(function) = side else {
                            continue;
                        };
                        self.write_indent();
                        self.write(label);
                        self.write(": ");
                        self.emit_function_stub(function, false);
                        self.write(",");
                        self.write_line();
                    }
                    self.emit_define_property_close(flags);
                }
            }
        }

        self.write_indent();
        self.write(&format!("return {name};"));
        self.write_line();
        self.decrease_indent();
        self.write("}());");
        self.write_line();
    }

    fn emit_constructor(&mut self, class: &Constructible, name: &str) {
        let params: Vec<&str> = class.constructor_params().collect();
        self.write_indent();
        self.write(&format!("function {name}({}) {{", params.join(", ")));
        self.write_line();
        self.increase_indent();

        self.write_indent();
        self.write(&format!("if (!(this instanceof {name})) {{"));
        self.write_line();
        self.increase_indent();
        self.write_indent();
        self.write("throw new TypeError(\"");
        self.write_escaped(&format!(
            "Class constructor {} cannot be invoked without instantiation",
            class.name()
        ));
        self.write("\");");
        self.write_line();
        self.decrease_indent();
        self.write_indent();
        self.write("}");
        self.write_line();

        for field in class.field_initializers() {
            self.write_indent();
            self.write("this");
            self.emit_member_access(field.key());
            self.write(" = ");
            match field.initializer() {
                Some(_) => self.write("(function () { [native code] }).call(this)"),
                None => self.write("void 0"),
            }
            self.write(";");
            self.write_line();
        }

        self.write_indent();
        self.write("[native code]");
        self.write_line();
        self.decrease_indent();
        self.write_indent();
        self.write("}");
        self.write_line();
    }

    fn emit_define_property_open(&mut self, class_name: &str, key: &PropertyKey) {
        self.write_indent();
        self.write(&format!("Object.defineProperty({class_name}.prototype, "));
        self.emit_key_expression(key);
        self.write(", {");
        self.write_line();
        self.increase_indent();
    }

    fn emit_define_property_close(&mut self, flags: PropertyFlags) {
        self.write_indent();
        self.write(&format!("enumerable: {},", flags.is_enumerable()));
        self.write_line();
        self.write_indent();
        self.write(&format!("configurable: {}", flags.contains(PropertyFlags::CONFIGURABLE)));
        self.write_line();
        self.decrease_indent();
        self.write_indent();
        self.write("});");
        self.write_line();
    }

    fn emit_function_stub(&mut self, function: &Function, named: bool) {
        self.write(if function.is_generator() { "function*" } else { "function" });
        let name = function.name();
        if named && PropertyKey::from(name).is_identifier() {
            self.write(" ");
            self.write(name);
        } else {
            self.write(" ");
        }
        let params: Vec<&str> = function.params().collect();
        self.write(&format!("({}) {{ [native code] }}", params.join(", ")));
    }

    /// `"key"` or the hoisted temporary of a symbol key.
    fn emit_key_expression(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::String(text) => {
                self.write("\"");
                self.write_escaped(text);
                self.write("\"");
            }
            PropertyKey::Symbol(symbol) => {
                let temp = self.symbol_temp(symbol);
                self.write(&temp);
            }
        }
    }

    /// `.key` when `key` is an identifier, else `[expr]`.
    fn emit_member_access(&mut self, key: &PropertyKey) {
        if let Some(text) = key.as_str().filter(|_| key.is_identifier()) {
            self.write(".");
            self.write(text);
        } else {
            self.write("[");
            self.emit_key_expression(key);
            self.write("]");
        }
    }

    fn collect_symbols<'k>(&mut self, keys: impl Iterator<Item = &'k PropertyKey>) {
        for key in keys {
            if let PropertyKey::Symbol(symbol) = key
                && !self.symbols.iter().any(|(known, _)| known == symbol)
            {
                let temp = temp_name(self.symbols.len());
                self.symbols.push((symbol.clone(), temp));
            }
        }
    }

    fn symbol_temp(&self, symbol: &Symbol) -> String {
        self.symbols
            .iter()
            .find(|(known, _)| known == symbol)
            .map(|(_, temp)| temp.clone())
            .unwrap_or_else(|| format!("/* {symbol} */ void 0"))
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_escaped(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if (c as u32) < 0x20 || c == '\x7F' => {
                    self.output.push_str(&format!("\\u{:04X}", c as u32));
                }
                _ => self.output.push(c),
            }
        }
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str("    ");
        }
    }

    const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

/// `_a` .. `_z`, then `_a1`, `_b1`, ...
fn temp_name(index: usize) -> String {
    let letter = char::from(b'a' + (index % 26) as u8);
    match index / 26 {
        0 => format!("_{letter}"),
        round => format!("_{letter}{round}"),
    }
}

#[cfg(test)]
#[path = "../tests/es5_tests.rs"]
mod tests;
