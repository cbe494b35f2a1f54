//! UMD shell registering a bundle through whichever module system is present.

use crate::bundle::string_literal;

/// Opening of the UMD shell. The bundle expression follows `return `.
///
/// Registration paths are tried in order: AMD `define`, CMD (`seajs`)
/// `define`, a CommonJS `module`, then a plain property on the context.
pub const UMD_HEAD: &str = r#"(function(root, factory, name){
  if (typeof define === 'function' && define.amd) {
    define(factory);
  } else if (typeof define === 'function' && define.cmd) {
    define(function(require, exports, module){ module.exports = factory(); });
  } else if (typeof module === 'object' && module && typeof module.exports === 'object') {
    module.exports = factory();
  } else {
    root[name] = factory();
  }
})(this, function(){
  return "#;

/// Close the UMD shell, exporting slot `slot` under `name` for plain globals.
pub fn umd_tail(slot: usize, name: &str) -> String {
    format!("({slot});\n}}, {})", string_literal(name))
}
