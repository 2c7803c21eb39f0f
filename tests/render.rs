use wgpu_fractal::{
    colour::Colour,
    complex::Complex,
    dispatch::{Backend, RenderDispatcher},
    escape,
    field::compute_field,
    params::{FractalFamily, FractalParameters},
    scalar,
    screen::Size,
    surface::MemorySurface,
};

#[test]
fn centre_of_default_mandelbrot_is_bounded_and_black() {
    let params = FractalParameters {
        family: FractalFamily::Mandelbrot,
        max_iterations: 100,
        view_scale: 4.0,
        pan_offset: Complex::new(0.0, 0.0),
        ..Default::default()
    };
    let size = Size::new(800, 800);

    assert_eq!(
        size.to_complex(400, 400, params.view_scale, params.pan_offset),
        Complex::new(0.0, 0.0)
    );

    let field = compute_field(&params, size);
    assert_eq!(field.get(400, 400), Some(100));

    let mut surface = MemorySurface::new(size);
    let backend = RenderDispatcher::new()
        .render(&params, &mut surface)
        .unwrap();
    assert_eq!(backend, Backend::Scalar);
    let frame = surface.frame().unwrap();
    assert_eq!(frame.pixel(400, 400), Some(Colour::BLACK.rgba()));
}

#[test]
fn julia_orbit_is_mandelbrot_orbit_shifted_by_one_step() {
    let constant = Complex::new(-0.7, 0.27015);
    let params = FractalParameters {
        family: FractalFamily::Julia,
        julia_constant: constant,
        max_iterations: 100,
        view_scale: 4.0,
        pan_offset: constant,
        ..Default::default()
    };
    let size = Size::new(64, 64);

    // The centre pixel looks exactly at the Julia constant.
    assert_eq!(
        size.to_complex(32, 32, params.view_scale, params.pan_offset),
        constant
    );

    let julia = compute_field(&params, size).get(32, 32).unwrap();
    let mandelbrot = escape::evaluate(constant, None, 101);
    if mandelbrot <= 100 {
        assert_eq!(julia, mandelbrot - 1);
    } else {
        assert_eq!(julia, 100);
    }

    let mandelbrot_params = FractalParameters {
        family: FractalFamily::Mandelbrot,
        ..params
    };
    assert_ne!(
        compute_field(&params, size),
        compute_field(&mandelbrot_params, size)
    );
}

#[test]
fn shifted_orbits_hold_across_the_plane() {
    for step in 0..50 {
        let c = Complex::new(-2.0 + step as f64 * 0.05, 0.3 - step as f64 * 0.01);
        let julia = escape::evaluate(c, Some(c), 40);
        let mandelbrot = escape::evaluate(c, None, 41);
        assert_eq!(julia, mandelbrot - 1);
    }
}

#[test]
fn dispatcher_frame_matches_host_pipeline() {
    let params = FractalParameters {
        family: FractalFamily::Julia,
        max_iterations: 64,
        view_scale: 3.0,
        hue_offset: 200.0,
        ..Default::default()
    };
    let size = Size::new(120, 90);

    let mut surface = MemorySurface::new(size);
    RenderDispatcher::new()
        .render(&params, &mut surface)
        .unwrap();

    let expected = scalar::render(
        &compute_field(&params, size),
        params.hue_offset,
        params.max_iterations,
    );
    assert_eq!(surface.into_frame(), Some(expected));
}

#[test]
fn renders_are_independent_of_history() {
    let mut dispatcher = RenderDispatcher::new();
    let size = Size::new(50, 50);
    let first = FractalParameters::default();
    let second = FractalParameters {
        pan_offset: Complex::new(-0.75, 0.1),
        view_scale: 0.5,
        ..first
    };

    let mut before = MemorySurface::new(size);
    dispatcher.render(&first, &mut before).unwrap();
    let mut between = MemorySurface::new(size);
    dispatcher.render(&second, &mut between).unwrap();
    let mut after = MemorySurface::new(size);
    dispatcher.render(&first, &mut after).unwrap();

    assert_eq!(before.frame(), after.frame());
    assert_ne!(before.frame(), between.frame());
}
