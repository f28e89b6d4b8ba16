//! End-to-end traces against simulated IOS switches.

#[cfg(test)]
mod search;
#[cfg(test)]
mod support;
